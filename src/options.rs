use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Settings for one PIT run. Every field is optional; an absent field means
/// the corresponding flag is left out of the argument list.
///
/// Field names serialize to PIT's own flag names (`targetClasses`,
/// `reportDir`, ...), so an options file reads like a PIT command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MutationOptions {
    pub target_classes: Option<String>,
    pub target_tests: Option<String>,
    pub report_dir: Option<String>,
    pub source_dirs: Option<String>,
    pub mutators: Option<String>,
    pub timeout_const: Option<String>,
    pub output_formats: Option<String>,
    pub dependency_distance: Option<String>,
    pub threads: Option<String>,
    pub excluded_methods: Option<String>,
    pub excluded_classes: Option<String>,
    pub excluded_tests: Option<String>,
    pub avoid_calls_to: Option<String>,
    pub timeout_factor: Option<String>,
    pub max_mutations_per_class: Option<String>,
    pub jvm_args: Option<String>,
    pub jvm_path: Option<String>,
    pub class_path: Option<String>,
    pub mutable_code_paths: Option<String>,
    pub test_plugin: Option<String>,
    pub included_groups: Option<String>,
    pub excluded_groups: Option<String>,
    pub detect_inlined_code: Option<String>,
    pub mutation_threshold: Option<String>,
    pub coverage_threshold: Option<String>,
    pub history_input_location: Option<String>,
    pub history_output_location: Option<String>,
    pub timestamped_reports: Option<String>,
    pub include_launch_classpath: Option<String>,
    pub verbose: Option<String>,
    pub fail_when_no_mutations: Option<String>,
}

impl MutationOptions {
    /// Read options from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let options = serde_json::from_str(&data).map_err(|source| Error::OptionsFile {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!("loaded mutation options from {}", path.display());
        Ok(options)
    }

    /// Set a single option by its PIT name. A leading `--` is accepted so
    /// flags can be copied straight from a PIT command line.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let key = name.strip_prefix("--").unwrap_or(name);
        let slot = self
            .field_mut(key)
            .ok_or_else(|| Error::UnknownOption(name.to_string()))?;
        *slot = Some(value.to_string());
        Ok(())
    }

    /// Apply a `name=value` override as given on the command line.
    pub fn apply_override(&mut self, spec: &str) -> Result<()> {
        let (name, value) = spec
            .split_once('=')
            .ok_or_else(|| Error::InvalidOverride(spec.to_string()))?;
        if name.is_empty() {
            return Err(Error::InvalidOverride(spec.to_string()));
        }
        self.set(name, value)
    }

    /// Same rule as Java's `Boolean.parseBoolean`: only "true", in any case.
    pub fn is_timestamped_reports(&self) -> bool {
        self.timestamped_reports
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        let slot = match key {
            "targetClasses" => &mut self.target_classes,
            "targetTests" => &mut self.target_tests,
            "reportDir" => &mut self.report_dir,
            "sourceDirs" => &mut self.source_dirs,
            "mutators" => &mut self.mutators,
            "timeoutConst" => &mut self.timeout_const,
            "outputFormats" => &mut self.output_formats,
            "dependencyDistance" => &mut self.dependency_distance,
            "threads" => &mut self.threads,
            "excludedMethods" => &mut self.excluded_methods,
            "excludedClasses" => &mut self.excluded_classes,
            "excludedTests" => &mut self.excluded_tests,
            "avoidCallsTo" => &mut self.avoid_calls_to,
            "timeoutFactor" => &mut self.timeout_factor,
            "maxMutationsPerClass" => &mut self.max_mutations_per_class,
            "jvmArgs" => &mut self.jvm_args,
            "jvmPath" => &mut self.jvm_path,
            "classPath" => &mut self.class_path,
            "mutableCodePaths" => &mut self.mutable_code_paths,
            "testPlugin" => &mut self.test_plugin,
            "includedGroups" => &mut self.included_groups,
            "excludedGroups" => &mut self.excluded_groups,
            "detectInlinedCode" => &mut self.detect_inlined_code,
            "mutationThreshold" => &mut self.mutation_threshold,
            "coverageThreshold" => &mut self.coverage_threshold,
            "historyInputLocation" => &mut self.history_input_location,
            "historyOutputLocation" => &mut self.history_output_location,
            "timestampedReports" => &mut self.timestamped_reports,
            "includeLaunchClasspath" => &mut self.include_launch_classpath,
            "verbose" => &mut self.verbose,
            "failWhenNoMutations" => &mut self.fail_when_no_mutations,
            _ => return None,
        };
        Some(slot)
    }
}
