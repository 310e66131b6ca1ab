use camino::{Utf8Path, Utf8PathBuf};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// PIT's command-line entry point.
pub const MAIN_CLASS: &str = "org.pitest.mutationtest.commandline.MutationCoverageReport";

/// Classpaths longer than this are handed to the JVM through an `@argfile`
/// instead of the command line.
pub const ARGFILE_THRESHOLD: usize = 8 * 1024;

#[cfg(windows)]
const CLASSPATH_SEPARATOR: &str = ";";
#[cfg(not(windows))]
const CLASSPATH_SEPARATOR: &str = ":";

/// Supplies the project's classpath: compiled classes, test classes and
/// their dependencies.
pub trait ClasspathSource {
    fn entries(&self) -> Result<Vec<Utf8PathBuf>>;
}

/// Classpath given up front: explicit entries followed by every jar found
/// in the library directories, each directory's jars sorted by name.
#[derive(Debug, Default, Clone)]
pub struct StaticClasspath {
    pub entries: Vec<Utf8PathBuf>,
    pub lib_dirs: Vec<Utf8PathBuf>,
}

impl ClasspathSource for StaticClasspath {
    fn entries(&self) -> Result<Vec<Utf8PathBuf>> {
        let mut out = self.entries.clone();
        for dir in &self.lib_dirs {
            let mut jars = Vec::new();
            let lib_dir_error = |source| Error::LibDir { path: dir.to_string(), source };
            for entry in std::fs::read_dir(dir).map_err(lib_dir_error)? {
                let path = entry.map_err(lib_dir_error)?.path();
                if path.extension().is_some_and(|ext| ext == "jar") && path.is_file() {
                    jars.push(utf8(path)?);
                }
            }
            jars.sort();
            tracing::debug!("found {} jars in {}", jars.len(), dir);
            out.extend(jars);
        }
        Ok(out)
    }
}

fn utf8(path: PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).map_err(|p| Error::NonUtf8Path(p.display().to_string()))
}

/// Everything needed to start the PIT JVM.
#[derive(Debug, Clone)]
pub struct JavaLaunch {
    pub java: PathBuf,
    /// PIT's own jars; always placed ahead of the project classpath.
    pub classpath_prefix: Vec<Utf8PathBuf>,
    pub classpath: Vec<Utf8PathBuf>,
    pub main_class: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub argfile_threshold: usize,
}

/// A command ready to spawn. The argument file, when there is one, lives
/// as long as this value.
pub struct PreparedLaunch {
    pub command: Command,
    pub argfile: Option<NamedTempFile>,
}

impl JavaLaunch {
    pub fn new(java: PathBuf, args: Vec<String>) -> Self {
        Self {
            java,
            classpath_prefix: Vec::new(),
            classpath: Vec::new(),
            main_class: MAIN_CLASS.to_string(),
            args,
            working_dir: None,
            argfile_threshold: ARGFILE_THRESHOLD,
        }
    }

    pub fn classpath_string(&self) -> String {
        self.classpath_prefix
            .iter()
            .chain(self.classpath.iter())
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(CLASSPATH_SEPARATOR)
    }

    /// JVM argv after the program name, classpath inline.
    pub fn jvm_argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 3);
        let classpath = self.classpath_string();
        if !classpath.is_empty() {
            argv.push("-cp".to_string());
            argv.push(classpath);
        }
        argv.push(self.main_class.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Build the command, moving the classpath into an argument file when it
    /// is longer than `argfile_threshold`.
    pub fn prepare(&self) -> Result<PreparedLaunch> {
        let classpath = self.classpath_string();
        let mut cmd = Command::new(&self.java);
        let mut argfile = None;
        if classpath.len() > self.argfile_threshold {
            let file = write_argfile(&classpath)?;
            tracing::debug!(
                "classpath of {} bytes written to {}",
                classpath.len(),
                file.path().display()
            );
            cmd.arg(format!("@{}", file.path().display()));
            argfile = Some(file);
        } else if !classpath.is_empty() {
            cmd.arg("-cp").arg(&classpath);
        }
        cmd.arg(&self.main_class).args(&self.args);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        Ok(PreparedLaunch { command: cmd, argfile })
    }
}

/// JVM argument files split on whitespace; quote the classpath and escape
/// backslashes and quotes inside it.
fn write_argfile(classpath: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("pitlaunch-")
        .suffix(".args")
        .tempfile()?;
    let quoted = classpath.replace('\\', "\\\\").replace('"', "\\\"");
    writeln!(file, "-cp \"{quoted}\"")?;
    file.flush()?;
    Ok(file)
}

/// `<java_home>/bin/java` when it exists, otherwise plain `java` for PATH
/// lookup.
pub fn resolve_java(java_home: Option<&Utf8Path>) -> PathBuf {
    let exe = if cfg!(windows) { "java.exe" } else { "java" };
    if let Some(home) = java_home {
        let candidate = home.join("bin").join(exe);
        if candidate.is_file() {
            return candidate.into_std_path_buf();
        }
        tracing::warn!("no java executable at {}, falling back to PATH", candidate);
    }
    PathBuf::from(exe)
}

/// Receives the child's console output, one line at a time.
pub trait ConsoleSink {
    fn stdout_line(&mut self, line: &str);
    fn stderr_line(&mut self, line: &str);
}

/// Forwards output to this process's own stdout and stderr.
pub struct PassthroughConsole;

impl ConsoleSink for PassthroughConsole {
    fn stdout_line(&mut self, line: &str) {
        println!("{line}");
    }

    fn stderr_line(&mut self, line: &str) {
        eprintln!("{line}");
    }
}

/// Drops all output.
pub struct NullConsole;

impl ConsoleSink for NullConsole {
    fn stdout_line(&mut self, _line: &str) {}

    fn stderr_line(&mut self, _line: &str) {}
}

/// Collects output in memory.
#[derive(Debug, Default)]
pub struct CapturedConsole {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl ConsoleSink for CapturedConsole {
    fn stdout_line(&mut self, line: &str) {
        self.stdout.push(line.to_string());
    }

    fn stderr_line(&mut self, line: &str) {
        self.stderr.push(line.to_string());
    }
}

enum Line {
    Out(String),
    Err(String),
}

fn pump<R: Read + Send + 'static>(
    reader: R,
    tx: mpsc::Sender<Line>,
    wrap: fn(String) -> Line,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for line in BufReader::new(reader).lines() {
            let Ok(line) = line else { break };
            if tx.send(wrap(line)).is_err() {
                break;
            }
        }
    })
}

/// Start the JVM, stream both output streams into `sink` until they close,
/// then wait for the process to exit.
pub fn run(launch: &JavaLaunch, sink: &mut dyn ConsoleSink) -> Result<ExitStatus> {
    tracing::info!("starting {} {}", launch.java.display(), launch.main_class);
    let mut prepared = launch.prepare()?;
    let mut child = prepared
        .command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| Error::Spawn {
            program: launch.java.display().to_string(),
            source,
        })?;

    let (tx, rx) = mpsc::channel();
    let mut readers = Vec::with_capacity(2);
    if let Some(out) = child.stdout.take() {
        readers.push(pump(out, tx.clone(), Line::Out));
    }
    if let Some(err) = child.stderr.take() {
        readers.push(pump(err, tx.clone(), Line::Err));
    }
    drop(tx);

    for line in rx {
        match line {
            Line::Out(l) => sink.stdout_line(&l),
            Line::Err(l) => sink.stderr_line(&l),
        }
    }
    for reader in readers {
        let _ = reader.join();
    }

    let status = child.wait()?;
    drop(prepared.argfile);
    tracing::info!("PIT process exited with {}", status);
    Ok(status)
}
