use chrono::{DateTime, Local};

use crate::options::MutationOptions;

/// Format of the per-run report subdirectory name.
pub const DATE_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

const PATH_SEPARATOR: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// `--flag value`, passed as two tokens.
    Pair { flag: &'static str, value: String },
    /// `--flag=value`, passed as one token.
    Combined(String),
}

pub fn creation_timestamp(now: DateTime<Local>) -> String {
    now.format(DATE_FORMAT).to_string()
}

/// Report directory for this run: the configured directory with one trailing
/// slash removed, plus the creation timestamp. No directory, no path.
pub fn report_path(report_dir: Option<&str>, timestamp: &str) -> Option<String> {
    let dir = report_dir?;
    let dir = dir.strip_suffix(PATH_SEPARATOR).unwrap_or(dir);
    Some(format!("{dir}{PATH_SEPARATOR}{timestamp}"))
}

/// Translate options into PIT's argument list. `--reportDir` takes the
/// derived `report_path`, never the configured directory.
pub fn build_arguments(options: &MutationOptions, report_path: Option<&str>) -> Vec<Argument> {
    let value_flags: [(&'static str, Option<&str>); 27] = [
        ("--targetClasses", options.target_classes.as_deref()),
        ("--targetTests", options.target_tests.as_deref()),
        ("--reportDir", report_path),
        ("--sourceDirs", options.source_dirs.as_deref()),
        ("--mutators", options.mutators.as_deref()),
        ("--timeoutConst", options.timeout_const.as_deref()),
        ("--outputFormats", options.output_formats.as_deref()),
        ("--dependencyDistance", options.dependency_distance.as_deref()),
        ("--threads", options.threads.as_deref()),
        ("--excludedMethods", options.excluded_methods.as_deref()),
        ("--excludedClasses", options.excluded_classes.as_deref()),
        ("--excludedTests", options.excluded_tests.as_deref()),
        ("--avoidCallsTo", options.avoid_calls_to.as_deref()),
        ("--timeoutFactor", options.timeout_factor.as_deref()),
        ("--maxMutationsPerClass", options.max_mutations_per_class.as_deref()),
        ("--jvmArgs", options.jvm_args.as_deref()),
        ("--jvmPath", options.jvm_path.as_deref()),
        ("--classPath", options.class_path.as_deref()),
        ("--mutableCodePaths", options.mutable_code_paths.as_deref()),
        ("--testPlugin", options.test_plugin.as_deref()),
        ("--includedGroups", options.included_groups.as_deref()),
        ("--excludedGroups", options.excluded_groups.as_deref()),
        ("--detectInlinedCode", options.detect_inlined_code.as_deref()),
        ("--mutationThreshold", options.mutation_threshold.as_deref()),
        ("--coverageThreshold", options.coverage_threshold.as_deref()),
        ("--historyInputLocation", options.history_input_location.as_deref()),
        ("--historyOutputLocation", options.history_output_location.as_deref()),
    ];

    let mut args = Vec::with_capacity(value_flags.len() + 4);
    for (flag, value) in value_flags {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            args.push(Argument::Pair { flag, value: value.to_string() });
        }
    }

    // These may be empty but not absent.
    let switch_flags = [
        ("timestampedReports", &options.timestamped_reports),
        ("includeLaunchClasspath", &options.include_launch_classpath),
        ("verbose", &options.verbose),
        ("failWhenNoMutations", &options.fail_when_no_mutations),
    ];
    for (name, value) in switch_flags {
        if let Some(value) = value {
            args.push(Argument::Combined(format!("--{name}={value}")));
        }
    }

    tracing::debug!("built {} PIT arguments", args.len());
    args
}

pub fn to_argv(args: &[Argument]) -> Vec<String> {
    let mut argv = Vec::with_capacity(args.len() * 2);
    for arg in args {
        match arg {
            Argument::Pair { flag, value } => {
                argv.push(flag.to_string());
                argv.push(value.clone());
            }
            Argument::Combined(token) => argv.push(token.clone()),
        }
    }
    argv
}
