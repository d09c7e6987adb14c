//! Query backend that shells out to `nix path-info`.

use std::path::PathBuf;
use std::process::{Command, Output};

use tracing::{debug, warn};

use crate::config::QueryConfig;
use crate::error::{QueryError, QueryResult};
use crate::record::{decode_path_info, PathInfo};
use crate::traits::PathInfoQuery;

/// Runs one `nix path-info --json --recursive --size` per query.
#[derive(Clone, Debug, Default)]
pub struct NixPathInfo {
    config: QueryConfig,
}

impl NixPathInfo {
    pub fn new(config: QueryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Build the command for a query without running it.
    pub fn command(&self, paths: &[PathBuf]) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.extra_args)
            .args(["path-info", "--json", "--recursive", "--size", "--"])
            .args(paths);
        cmd
    }

    /// Turn the process output into a batch.
    ///
    /// Nix exits non-zero when a requested path is invalid but still prints
    /// the batch with the invalid marker in it. That batch is returned so the
    /// caller can name the offending path; any other failure is an error.
    fn interpret(&self, output: Output) -> QueryResult<Vec<PathInfo>> {
        if output.status.success() {
            return decode_path_info(&output.stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        match decode_path_info(&output.stdout) {
            Ok(records) if records.iter().any(|r| !r.is_valid()) => {
                warn!(status = %output.status, "path-info failed on invalid paths");
                Ok(records)
            }
            _ => Err(QueryError::CommandFailed {
                program: self.config.program.clone(),
                status: output.status.to_string(),
                stderr,
            }),
        }
    }
}

impl PathInfoQuery for NixPathInfo {
    fn query_closure(&self, paths: &[PathBuf]) -> QueryResult<Vec<PathInfo>> {
        if paths.is_empty() {
            return Ok(Vec::new());
        }

        debug!(program = %self.config.program, roots = paths.len(), "running path-info query");
        let output = self
            .command(paths)
            .output()
            .map_err(|source| QueryError::Spawn {
                program: self.config.program.clone(),
                source,
            })?;

        let records = self.interpret(output)?;
        debug!(records = records.len(), "path-info query finished");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn command_line_shape() {
        let query = NixPathInfo::default();
        let cmd = query.command(&[PathBuf::from("/nix/store/aaa-foo")]);
        assert_eq!(cmd.get_program(), OsStr::new("nix"));
        let args: Vec<&OsStr> = cmd.get_args().collect();
        assert_eq!(
            args,
            [
                "--extra-experimental-features",
                "nix-command",
                "path-info",
                "--json",
                "--recursive",
                "--size",
                "--",
                "/nix/store/aaa-foo",
            ]
            .map(OsStr::new)
        );
    }

    #[test]
    fn empty_request_issues_no_command() {
        let query = NixPathInfo::new(QueryConfig {
            program: "/nonexistent/storegraph-nix".into(),
            extra_args: Vec::new(),
        });
        assert!(query.query_closure(&[]).unwrap().is_empty());
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let query = NixPathInfo::new(QueryConfig {
            program: "/nonexistent/storegraph-nix".into(),
            extra_args: Vec::new(),
        });
        let err = query
            .query_closure(&[PathBuf::from("/nix/store/aaa-foo")])
            .unwrap_err();
        assert!(matches!(err, QueryError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_without_batch_is_command_failed() {
        let query = NixPathInfo::new(QueryConfig {
            program: "false".into(),
            extra_args: Vec::new(),
        });
        let err = query
            .query_closure(&[PathBuf::from("/nix/store/aaa-foo")])
            .unwrap_err();
        assert!(matches!(err, QueryError::CommandFailed { .. }));
    }

    /// A backend whose "nix" is a shell script printing `stdout` and exiting 1.
    #[cfg(unix)]
    fn failing_with_output(stdout: &str) -> NixPathInfo {
        NixPathInfo::new(QueryConfig {
            program: "sh".into(),
            extra_args: vec![
                "-c".into(),
                format!("printf '%s' '{stdout}'; exit 1"),
                "sh".into(),
            ],
        })
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_with_invalid_marker_returns_the_batch() {
        let query = failing_with_output(r#"[{"path":"/nix/store/aaa-gone","valid":false}]"#);
        let records = query
            .query_closure(&[PathBuf::from("/nix/store/aaa-gone")])
            .unwrap();
        assert_eq!(records, vec![PathInfo::invalid("/nix/store/aaa-gone")]);
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_with_valid_batch_is_command_failed() {
        let query = failing_with_output(
            r#"[{"path":"/nix/store/aaa-foo","narSize":10,"references":[]}]"#,
        );
        let err = query
            .query_closure(&[PathBuf::from("/nix/store/aaa-foo")])
            .unwrap_err();
        match err {
            QueryError::CommandFailed { program, .. } => assert_eq!(program, "sh"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
