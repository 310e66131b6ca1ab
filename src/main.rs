use pitlaunch::launch::{
    self, ClasspathSource, ConsoleSink, JavaLaunch, NullConsole, PassthroughConsole,
    StaticClasspath,
};
use pitlaunch::messages::message;
use pitlaunch::options::MutationOptions;
use pitlaunch::output;
use pitlaunch::parameters;
use pitlaunch::report;
use pitlaunch::state;

use std::path::{Path, PathBuf};
use std::process;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pitlaunch", version, about = "Launch PIT mutation testing from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run PIT with the given options
    Run {
        /// JSON options file (keys are PIT flag names, e.g. targetClasses)
        options: Option<PathBuf>,
        /// Override a single option, e.g. --set threads=4
        #[arg(long = "set", value_name = "NAME=VALUE")]
        overrides: Vec<String>,
        /// Project classpath entry (classes dir or jar); repeatable
        #[arg(long = "cp", value_name = "PATH")]
        classpath: Vec<Utf8PathBuf>,
        /// Directory whose jars are added to the project classpath; repeatable
        #[arg(long, value_name = "DIR")]
        lib_dir: Vec<Utf8PathBuf>,
        /// PIT jar placed ahead of the project classpath; repeatable
        #[arg(long, value_name = "PATH")]
        pitest_jar: Vec<Utf8PathBuf>,
        /// JDK used to start PIT (default: java on PATH)
        #[arg(long, env = "JAVA_HOME")]
        java_home: Option<Utf8PathBuf>,
        /// Print the java command instead of running it
        #[arg(long)]
        dry_run: bool,
        /// Suppress PIT's console output and the report link
        #[arg(short, long)]
        quiet: bool,
    },
    /// Print the PIT argument list for the given options
    Args {
        /// JSON options file
        options: Option<PathBuf>,
        /// Override a single option, e.g. --set threads=4
        #[arg(long = "set", value_name = "NAME=VALUE")]
        overrides: Vec<String>,
        /// Output JSON instead of one token per line
        #[arg(long)]
        json: bool,
    },
    /// Print the timestamped report directory for a configured report dir
    ReportPath {
        /// Configured report directory
        dir: String,
        /// Timestamp to use (default: now, as yyyy-MM-dd-HH-mm-ss)
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Show the report of the last run
    Status {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Run {
            options,
            overrides,
            classpath,
            lib_dir,
            pitest_jar,
            java_home,
            dry_run,
            quiet,
        } => cmd_run(RunArgs {
            options,
            overrides,
            classpath: StaticClasspath { entries: classpath, lib_dirs: lib_dir },
            pitest_jars: pitest_jar,
            java_home,
            dry_run,
            quiet,
        }),
        Commands::Args { options, overrides, json } => cmd_args(options, &overrides, json),
        Commands::ReportPath { dir, timestamp } => cmd_report_path(dir, timestamp),
        Commands::Status { json } => cmd_status(json),
    };

    process::exit(exit_code);
}

struct RunArgs {
    options: Option<PathBuf>,
    overrides: Vec<String>,
    classpath: StaticClasspath,
    pitest_jars: Vec<Utf8PathBuf>,
    java_home: Option<Utf8PathBuf>,
    dry_run: bool,
    quiet: bool,
}

fn now_timestamp() -> String {
    parameters::creation_timestamp(chrono::Local::now())
}

fn load_options(
    path: Option<&Path>,
    overrides: &[String],
) -> Result<MutationOptions, pitlaunch::Error> {
    let mut options = match path {
        Some(p) => MutationOptions::load(p)?,
        None => MutationOptions::default(),
    };
    for spec in overrides {
        options.apply_override(spec)?;
    }
    Ok(options)
}

fn cmd_run(args: RunArgs) -> i32 {
    // Captured once so the launched flags and the printed link agree.
    let created = now_timestamp();

    let options = match load_options(args.options.as_deref(), &args.overrides) {
        Ok(o) => o,
        Err(e) => {
            output::print_error(&e.to_string());
            return 2;
        }
    };

    let report_path = parameters::report_path(options.report_dir.as_deref(), &created);
    if report_path.is_none() && !args.quiet {
        output::print_warning(message("report.missing"));
    }
    let arguments = parameters::build_arguments(&options, report_path.as_deref());
    let argv = parameters::to_argv(&arguments);

    let classpath = match args.classpath.entries() {
        Ok(c) => c,
        Err(e) => {
            output::print_error(&format!("Failed to assemble classpath: {}", e));
            return 3;
        }
    };

    let java = launch::resolve_java(args.java_home.as_deref());
    let mut java_launch = JavaLaunch::new(java, argv.clone());
    java_launch.classpath_prefix = args.pitest_jars;
    java_launch.classpath = classpath;

    if args.dry_run {
        output::print_argv(&java_launch.java.display().to_string(), &java_launch.jvm_argv());
        return 0;
    }

    if !args.quiet {
        output::print_success(message("run.starting"));
    }
    let mut passthrough = PassthroughConsole;
    let mut discard = NullConsole;
    let sink: &mut dyn ConsoleSink = if args.quiet { &mut discard } else { &mut passthrough };

    let status = match launch::run(&java_launch, sink) {
        Ok(s) => s,
        Err(e) => {
            output::print_error(&e.to_string());
            return 3;
        }
    };

    let link = report::report_link(&options, report_path.as_deref());
    let exit_code = status.code().unwrap_or(1);

    if !args.quiet {
        if status.success() {
            output::print_success(message("run.finished"));
        } else {
            output::print_error(&format!("{} {}", message("run.failed"), exit_code));
        }
        if let Some(ref l) = link {
            output::print_hyperlink(l);
        }
    }

    state::save_last_run(&state::LastRun {
        created,
        report_path,
        report_link: link,
        argv,
        exit_code: Some(exit_code),
    });

    exit_code
}

fn cmd_args(options: Option<PathBuf>, overrides: &[String], json_mode: bool) -> i32 {
    let options = match load_options(options.as_deref(), overrides) {
        Ok(o) => o,
        Err(e) => {
            output::print_error(&e.to_string());
            return 2;
        }
    };

    let created = now_timestamp();
    let report_path = parameters::report_path(options.report_dir.as_deref(), &created);
    let arguments = parameters::build_arguments(&options, report_path.as_deref());

    if json_mode {
        match serde_json::to_string(&parameters::to_argv(&arguments)) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                output::print_error(&e.to_string());
                return 3;
            }
        }
    } else {
        for token in parameters::to_argv(&arguments) {
            println!("{}", token);
        }
    }
    0
}

fn cmd_report_path(dir: String, timestamp: Option<String>) -> i32 {
    let timestamp = timestamp.unwrap_or_else(now_timestamp);
    match parameters::report_path(Some(dir.as_str()), &timestamp) {
        Some(path) => {
            println!("{}", path);
            0
        }
        None => 2,
    }
}

fn cmd_status(json_mode: bool) -> i32 {
    match state::load_last_run() {
        Some(run) => {
            if json_mode {
                match serde_json::to_string(&run) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        output::print_error(&e.to_string());
                        return 3;
                    }
                }
                return 0;
            }
            println!(
                "Last run: {} (exit code {})",
                run.created,
                run.exit_code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
            );
            match run.report_link {
                Some(ref link) => output::print_hyperlink(link),
                None => println!("{}", message("report.missing")),
            }
            0
        }
        None => {
            output::print_error(message("status.none"));
            2
        }
    }
}
