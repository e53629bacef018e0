// PyO3 Bindings Module
//
// Lets a Python host embed the tag tool: the host registers its own output
// and exit callables, then drives tracing through the Tracer class.

mod host;
mod tracer;

pub use host::{redirect_output, use_direct_output};
pub use tracer::PyTracer;
