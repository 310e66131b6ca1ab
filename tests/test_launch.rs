use camino::{Utf8Path, Utf8PathBuf};
use pitlaunch::launch::{
    self, CapturedConsole, ClasspathSource, JavaLaunch, MAIN_CLASS, NullConsole, StaticClasspath,
};
use std::path::PathBuf;
use tempfile::TempDir;

fn utf8_dir(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
}

// --- StaticClasspath ---

#[test]
fn static_classpath_lists_entries_then_sorted_jars() {
    let dir = TempDir::new().unwrap();
    let lib = utf8_dir(&dir);
    std::fs::write(lib.join("b.jar"), "").unwrap();
    std::fs::write(lib.join("a.jar"), "").unwrap();
    std::fs::write(lib.join("notes.txt"), "").unwrap();

    let source = StaticClasspath {
        entries: vec![Utf8PathBuf::from("target/classes")],
        lib_dirs: vec![lib.clone()],
    };
    let entries = source.entries().unwrap();
    assert_eq!(
        entries,
        vec![Utf8PathBuf::from("target/classes"), lib.join("a.jar"), lib.join("b.jar")]
    );
}

#[test]
fn static_classpath_missing_lib_dir_errors() {
    let source = StaticClasspath {
        entries: vec![],
        lib_dirs: vec![Utf8PathBuf::from("/nonexistent/lib")],
    };
    let err = source.entries().unwrap_err();
    assert!(matches!(err, pitlaunch::Error::LibDir { .. }));
    assert!(err.to_string().contains("/nonexistent/lib"));
}

// --- JavaLaunch ---

#[test]
fn jvm_argv_puts_prefix_first() {
    let mut launch = JavaLaunch::new(PathBuf::from("java"), vec!["--threads".into(), "2".into()]);
    launch.classpath_prefix = vec![Utf8PathBuf::from("pitest.jar")];
    launch.classpath = vec![Utf8PathBuf::from("classes"), Utf8PathBuf::from("junit.jar")];

    let sep = if cfg!(windows) { ";" } else { ":" };
    assert_eq!(
        launch.jvm_argv(),
        vec![
            "-cp".to_string(),
            format!("pitest.jar{sep}classes{sep}junit.jar"),
            MAIN_CLASS.to_string(),
            "--threads".to_string(),
            "2".to_string(),
        ]
    );
}

#[test]
fn jvm_argv_without_classpath_skips_cp() {
    let launch = JavaLaunch::new(PathBuf::from("java"), vec![]);
    assert_eq!(launch.jvm_argv(), vec![MAIN_CLASS.to_string()]);
}

fn args_of(prepared: &launch::PreparedLaunch) -> Vec<String> {
    prepared
        .command
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn short_classpath_stays_on_command_line() {
    let mut launch = JavaLaunch::new(PathBuf::from("java"), vec!["--verbose=true".into()]);
    launch.classpath = vec![Utf8PathBuf::from("classes")];

    let prepared = launch.prepare().unwrap();
    assert!(prepared.argfile.is_none());
    assert_eq!(args_of(&prepared), vec!["-cp", "classes", MAIN_CLASS, "--verbose=true"]);
}

#[test]
fn long_classpath_moves_to_argfile() {
    let mut launch = JavaLaunch::new(PathBuf::from("java"), vec!["--threads".into(), "2".into()]);
    launch.classpath_prefix = vec![Utf8PathBuf::from("pitest.jar")];
    launch.classpath = vec![Utf8PathBuf::from("my classes"), Utf8PathBuf::from("lib\\a\"b.jar")];
    launch.argfile_threshold = 0;

    let prepared = launch.prepare().unwrap();
    let argfile = prepared.argfile.as_ref().expect("argfile should be written");
    let args = args_of(&prepared);
    assert_eq!(args[0], format!("@{}", argfile.path().display()));
    assert_eq!(&args[1..], [MAIN_CLASS, "--threads", "2"]);

    let sep = if cfg!(windows) { ";" } else { ":" };
    let contents = std::fs::read_to_string(argfile.path()).unwrap();
    assert_eq!(
        contents,
        format!("-cp \"pitest.jar{sep}my classes{sep}lib\\\\a\\\"b.jar\"\n")
    );
}

#[test]
fn argfile_removed_with_prepared_launch() {
    let mut launch = JavaLaunch::new(PathBuf::from("java"), vec![]);
    launch.classpath = vec![Utf8PathBuf::from("classes")];
    launch.argfile_threshold = 0;

    let prepared = launch.prepare().unwrap();
    let path = prepared.argfile.as_ref().unwrap().path().to_path_buf();
    assert!(path.exists());
    drop(prepared);
    assert!(!path.exists());
}

#[test]
fn resolve_java_falls_back_to_path() {
    let java = launch::resolve_java(Some(Utf8Path::new("/nonexistent/jdk")));
    assert!(java.ends_with(if cfg!(windows) { "java.exe" } else { "java" }));
    assert!(!java.is_absolute());
    assert_eq!(launch::resolve_java(None), java);
}

#[cfg(unix)]
fn fake_java(dir: &Utf8Path, script: &str) -> Utf8PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let bin = dir.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let java = bin.join("java");
    std::fs::write(&java, format!("#!/bin/sh\n{script}\n")).unwrap();
    std::fs::set_permissions(&java, std::fs::Permissions::from_mode(0o755)).unwrap();
    java
}

#[cfg(unix)]
#[test]
fn resolve_java_uses_java_home() {
    let dir = TempDir::new().unwrap();
    let home = utf8_dir(&dir);
    let java = fake_java(&home, "exit 0");
    assert_eq!(launch::resolve_java(Some(home.as_path())), java.into_std_path_buf());
}

// --- run ---

#[cfg(unix)]
#[test]
fn run_streams_both_outputs_and_reports_exit() {
    let dir = TempDir::new().unwrap();
    let home = utf8_dir(&dir);
    let java = fake_java(&home, "printf '%s\\n' \"$@\"\necho oops >&2\nexit 3");

    let mut launch = JavaLaunch::new(java.into_std_path_buf(), vec!["--verbose=true".into()]);
    launch.classpath = vec![Utf8PathBuf::from("classes")];

    let mut console = CapturedConsole::default();
    let status = launch::run(&launch, &mut console).unwrap();

    assert_eq!(status.code(), Some(3));
    assert_eq!(console.stdout, vec!["-cp", "classes", MAIN_CLASS, "--verbose=true"]);
    assert_eq!(console.stderr, vec!["oops"]);
}

#[cfg(unix)]
#[test]
fn run_uses_working_dir() {
    let dir = TempDir::new().unwrap();
    let home = utf8_dir(&dir);
    let java = fake_java(&home, "pwd");

    let mut launch = JavaLaunch::new(java.into_std_path_buf(), vec![]);
    launch.working_dir = Some(dir.path().to_path_buf());

    let mut console = CapturedConsole::default();
    let status = launch::run(&launch, &mut console).unwrap();
    assert!(status.success());
    let reported = std::fs::canonicalize(&console.stdout[0]).unwrap();
    assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
}

#[cfg(unix)]
#[test]
fn run_passes_long_classpath_through_argfile() {
    let dir = TempDir::new().unwrap();
    let home = utf8_dir(&dir);
    let java = fake_java(&home, "cat \"${1#@}\"\nshift\nprintf '%s\\n' \"$@\"");

    let mut launch = JavaLaunch::new(java.into_std_path_buf(), vec!["--verbose=true".into()]);
    launch.classpath = vec![Utf8PathBuf::from("a.jar"), Utf8PathBuf::from("b.jar")];
    launch.argfile_threshold = 4;

    let mut console = CapturedConsole::default();
    let status = launch::run(&launch, &mut console).unwrap();
    assert!(status.success());
    assert_eq!(console.stdout, vec!["-cp \"a.jar:b.jar\"", MAIN_CLASS, "--verbose=true"]);
}

#[cfg(unix)]
#[test]
fn run_with_null_console_discards_output() {
    let dir = TempDir::new().unwrap();
    let home = utf8_dir(&dir);
    let java = fake_java(&home, "echo lots of output\necho more >&2\nexit 4");

    let launch = JavaLaunch::new(java.into_std_path_buf(), vec![]);
    let status = launch::run(&launch, &mut NullConsole).unwrap();
    assert_eq!(status.code(), Some(4));
}

#[test]
fn run_missing_program_is_spawn_error() {
    let launch = JavaLaunch::new(PathBuf::from("/nonexistent/bin/java"), vec![]);
    let mut console = CapturedConsole::default();
    let err = launch::run(&launch, &mut console).unwrap_err();
    assert!(matches!(err, pitlaunch::Error::Spawn { .. }));
}
