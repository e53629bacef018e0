// End-to-end: a host installs redirected output, configures tracing, runs a
// scan's worth of trace calls and then terminates cooperatively.

use std::sync::{Arc, Mutex};
use tagtrace_core::sink::global;
use tagtrace_core::{
    trace_at, DebugLevel, HostFunctions, RedirectedSink, Stream, TagRecord, TraceConfig, Tracer,
};

#[derive(Default)]
struct HostState {
    stdout: String,
    stderr: String,
    flushes: usize,
    exit_codes: Vec<i32>,
}

#[test]
fn test_host_captures_all_output_and_exit() {
    let state = Arc::new(Mutex::new(HostState::default()));

    let write_state = Arc::clone(&state);
    let flush_state = Arc::clone(&state);
    let exit_state = Arc::clone(&state);
    let host = HostFunctions::builder()
        .write(move |stream, text| {
            let mut state = write_state.lock().unwrap();
            match stream {
                Stream::Stdout => state.stdout.push_str(text),
                Stream::Stderr => state.stderr.push_str(text),
            }
        })
        .flush(move |_| flush_state.lock().unwrap().flushes += 1)
        .exit(move |code| exit_state.lock().unwrap().exit_codes.push(code))
        .temp_dir(|| "/host/tmp".into())
        .build()
        .unwrap();

    let console = global::install(RedirectedSink::new(host)).unwrap();
    assert!(global::install_direct().is_err());

    let config = TraceConfig::from_json_str(
        r#"{"debug": {"parse": true, "status": true}, "fields": {"file-scope": true}}"#,
    )
    .unwrap();
    let tracer = Tracer::from_config(global::console().unwrap(), &config);

    trace_at!(tracer, DebugLevel::Status, "OPENING {}\n", "main.c");
    tracer.parse_nest(true, 3);
    tracer.cpp_nest(true, 1);
    let tag = TagRecord::new("function", "foo").with_file_scope(true);
    tracer.emit_tag_entry(&tag, config.is_header_file(std::path::Path::new("main.c")));
    console.eprint(format_args!("warning: {}\n", "unterminated comment"));
    assert_eq!(console.temp_dir(), std::path::PathBuf::from("/host/tmp"));

    let terminated = console.terminate(1);
    assert_eq!(terminated.code, 1);

    // Control came back: the host chose cooperative continuation
    tracer.parse_nest(false, 2);
    console.puts("late");

    let state = state.lock().unwrap();
    assert_eq!(
        state.stdout,
        "OPENING main.c\n<*++nesting:3*><#{fs}function:foo [file:]#>"
    );
    assert_eq!(state.stderr, "warning: unterminated comment\n");
    assert_eq!(state.exit_codes, vec![1]);
    // One flush per trace message plus both streams at terminate
    assert_eq!(state.flushes, 3 + 2);
}
