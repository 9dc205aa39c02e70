use crate::manager::EnvManager;
use crate::process::{capture_stdout, probe};
use crate::registry::EnvRegistry;
use crate::ManagerError;
use envpicker_store::EnvironmentEntry;
use serde::Deserialize;
use serde_yaml::Value;
use std::path::PathBuf;
use std::process::Command;

/// The parts of `conda info --json` envpicker reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CondaInfo {
    #[serde(default)]
    pub envs: Vec<PathBuf>,
    #[serde(default)]
    pub conda_version: Option<String>,
    #[serde(default)]
    pub root_prefix: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct EnvExport {
    #[serde(default)]
    dependencies: Vec<Value>,
}

/// Flatten the `dependencies` of an `env export` document.
///
/// String items are kept as-is. Mapping items (the `pip:` section) contribute
/// the strings in their nested lists. Anything else is ignored.
pub fn parse_env_export(text: &str) -> Result<Vec<String>, ManagerError> {
    let export: EnvExport =
        serde_yaml::from_str(text).map_err(|e| ManagerError::InvalidExport(e.to_string()))?;
    let mut dependencies = Vec::new();
    for item in export.dependencies {
        match item {
            Value::String(spec) => dependencies.push(spec),
            Value::Mapping(section) => {
                for (key, nested) in section {
                    let Value::Sequence(items) = nested else {
                        tracing::debug!("ignoring non-list section {key:?}");
                        continue;
                    };
                    dependencies.extend(items.into_iter().filter_map(|v| match v {
                        Value::String(spec) => Some(spec),
                        _ => None,
                    }));
                }
            }
            other => tracing::debug!("ignoring dependency item {other:?}"),
        }
    }
    Ok(dependencies)
}

/// conda, or a CLI-compatible replacement such as mamba.
#[derive(Debug, Clone)]
pub struct CondaManager {
    registry: EnvRegistry,
    name: &'static str,
    tool: PathBuf,
}

impl CondaManager {
    pub fn conda(registry: EnvRegistry) -> Self {
        Self::with_tool(registry, "conda", "conda")
    }

    pub fn mamba(registry: EnvRegistry) -> Self {
        Self::with_tool(registry, "mamba", "mamba")
    }

    /// A manager called `name` that drives the executable `tool`.
    pub fn with_tool(registry: EnvRegistry, name: &'static str, tool: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            name,
            tool: tool.into(),
        }
    }

    fn command(&self) -> Command {
        Command::new(&self.tool)
    }

    pub fn info(&self) -> Result<CondaInfo, ManagerError> {
        let mut command = self.command();
        command.args(["info", "--json"]);
        let output = capture_stdout(command)?;
        serde_json::from_str(&output).map_err(|e| {
            ManagerError::InvalidExport(format!("{} info --json: {e}", self.tool.display()))
        })
    }
}

impl EnvManager for CondaManager {
    fn name(&self) -> &str {
        self.name
    }

    fn is_available(&self) -> bool {
        let mut command = self.command();
        command.arg("--version");
        probe(command)
    }

    fn registry(&self) -> &EnvRegistry {
        &self.registry
    }

    fn environment_paths(&self) -> Result<Vec<PathBuf>, ManagerError> {
        let info = self.info()?;
        tracing::debug!("{} lists {} environment(s)", self.name, info.envs.len());
        Ok(info.envs)
    }

    fn get_dependencies(&self, entry: &EnvironmentEntry) -> Result<Vec<String>, ManagerError> {
        let mut command = self.command();
        command
            .args(["env", "export", "--no-builds", "-p"])
            .arg(&entry.path);
        parse_env_export(&capture_stdout(command)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::EnvManagerExt;

    const EXPORT: &str = "name: test\ndependencies:\n  - numpy==1.0\n  - pip:\n    - pandas==1.0\n";

    #[test]
    fn export_flattens_pip_section() {
        assert_eq!(
            parse_env_export(EXPORT).unwrap(),
            ["numpy==1.0", "pandas==1.0"]
        );
    }

    #[test]
    fn export_keeps_conda_style_pins() {
        let text = "name: base\nchannels:\n  - defaults\ndependencies:\n  - python=3.11.4\n  - pip=23.2\nprefix: /opt/conda\n";
        assert_eq!(parse_env_export(text).unwrap(), ["python=3.11.4", "pip=23.2"]);
    }

    #[test]
    fn export_without_dependencies_is_empty() {
        assert!(parse_env_export("name: empty\n").unwrap().is_empty());
    }

    #[test]
    fn export_ignores_non_string_items() {
        let text = "dependencies:\n  - 42\n  - numpy==1.0\n  - pip: notalist\n";
        assert_eq!(parse_env_export(text).unwrap(), ["numpy==1.0"]);
    }

    #[test]
    fn malformed_export_is_an_error() {
        let err = parse_env_export("dependencies: [unclosed").unwrap_err();
        assert!(matches!(err, ManagerError::InvalidExport(_)));
    }

    #[test]
    fn info_json_parses() {
        let info: CondaInfo = serde_json::from_str(
            r#"{"envs": ["/opt/conda", "/opt/conda/envs/ml"], "conda_version": "24.1.2", "platform": "linux-64"}"#,
        )
        .unwrap();
        assert_eq!(info.envs.len(), 2);
        assert_eq!(info.conda_version.as_deref(), Some("24.1.2"));
        assert!(info.root_prefix.is_none());
    }

    #[test]
    fn missing_tool_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let registry = EnvRegistry::at(dir.path()).unwrap();
        let conda = CondaManager::with_tool(registry, "conda", dir.path().join("no-conda"));
        assert!(!conda.is_available());
        assert!(matches!(
            conda.environment_paths().unwrap_err(),
            ManagerError::ToolFailed { .. }
        ));
    }

    #[test]
    fn named_constructors() {
        let dir = tempfile::tempdir().unwrap();
        let registry = EnvRegistry::at(dir.path()).unwrap();
        assert_eq!(CondaManager::conda(registry.clone()).name(), "conda");
        assert_eq!(CondaManager::mamba(registry).name(), "mamba");
    }

    #[cfg(unix)]
    mod with_fake_tool {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::path::Path;

        fn write_script(path: &Path, body: &str) {
            fs::write(path, format!("#!/bin/sh\n{body}")).unwrap();
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }

        fn fake_env(dir: &Path, name: &str) -> PathBuf {
            let env = dir.join(name);
            fs::create_dir_all(env.join("bin")).unwrap();
            write_script(&env.join("bin").join("python"), "echo Python 3.11.4\n");
            env
        }

        fn fake_conda(dir: &Path, envs: &[PathBuf]) -> PathBuf {
            let listed: Vec<String> = envs.iter().map(|e| format!("\"{}\"", e.display())).collect();
            let tool = dir.join("conda");
            write_script(
                &tool,
                &format!(
                    "case \"$1\" in\n\
                     --version) echo conda 24.1.2 ;;\n\
                     info) echo '{{\"envs\": [{}]}}' ;;\n\
                     env) printf '{}' ;;\n\
                     *) exit 1 ;;\n\
                     esac\n",
                    listed.join(", "),
                    EXPORT.replace('\n', "\\n")
                ),
            );
            tool
        }

        #[test]
        fn drives_the_tool() {
            let dir = tempfile::tempdir().unwrap();
            let env = fake_env(dir.path(), "ml");
            let tool = fake_conda(dir.path(), std::slice::from_ref(&env));
            let registry = EnvRegistry::at(dir.path().join("reg")).unwrap();
            let conda = CondaManager::with_tool(registry, "conda", tool);

            assert!(conda.is_available());
            assert_eq!(conda.environment_paths().unwrap(), [env.clone()]);

            let full = conda.register(&env, None, None, false).unwrap();
            assert_eq!(full.dependencies(), ["numpy==1.0", "pandas==1.0"]);
        }

        #[test]
        fn register_all_adds_only_unregistered() {
            let dir = tempfile::tempdir().unwrap();
            let first = fake_env(dir.path(), "first");
            let second = fake_env(dir.path(), "second");
            let tool = fake_conda(dir.path(), &[first.clone(), second.clone()]);
            let registry = EnvRegistry::at(dir.path().join("reg")).unwrap();
            let conda = CondaManager::with_tool(registry, "conda", tool);

            conda.register(&first, None, None, false).unwrap();
            let registered = conda.register_all().unwrap();
            assert_eq!(registered.len(), 1);
            assert_eq!(registered[0].path, second);
            assert_eq!(conda.entries().unwrap().len(), 2);
        }
    }
}
