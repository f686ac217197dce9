//! Command translation
//!
//! Splits a resolved entry-point command into an interpreter, a module or
//! script reference, and an argument string. The module reference is joined
//! onto the working-directory URI without checking that it exists: existence
//! is verified remotely at execution time, not locally.

use std::fmt;

use crate::error::{BackendError, Result};

/// Interpreters the target cluster environment can host
///
/// Restricted to python: the runtime bundle shipped with each job only
/// carries a python runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpreter {
    Python,
}

impl Interpreter {
    fn parse(word: &str) -> Option<Self> {
        match word {
            "python" => Some(Interpreter::Python),
            _ => None,
        }
    }
}

impl fmt::Display for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpreter::Python => write!(f, "python"),
        }
    }
}

/// A command split into the pieces the submitter needs
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchCommand {
    pub interpreter: Interpreter,

    /// Module or script reference resolved against the working-directory URI
    pub module_path: String,

    /// Remaining tokens re-joined into a single argument string
    pub args: String,
}

impl LaunchCommand {
    /// Whether the reference is a script file rather than a module path
    pub fn is_script(&self) -> bool {
        self.module_path.ends_with(".py")
    }
}

/// Translates a resolved command string into a [`LaunchCommand`]
///
/// # Arguments
/// * `command` - The post-substitution entry-point command
/// * `base_uri` - Working-directory URI the module reference lives under
pub fn translate(command: &str, base_uri: &str) -> Result<LaunchCommand> {
    let mut parts = command.split_whitespace();

    let interpreter_word = parts
        .next()
        .ok_or_else(|| BackendError::MalformedCommand(command.to_string()))?;
    let interpreter = Interpreter::parse(interpreter_word)
        .ok_or_else(|| BackendError::UnsupportedInterpreter(interpreter_word.to_string()))?;

    let module = parts
        .next()
        .ok_or_else(|| BackendError::MalformedCommand(command.to_string()))?;
    let args = parts.collect::<Vec<_>>().join(" ");

    Ok(LaunchCommand {
        interpreter,
        module_path: join_uri(base_uri, module),
        args,
    })
}

fn join_uri(base_uri: &str, module: &str) -> String {
    if base_uri.is_empty() {
        module.to_string()
    } else {
        format!("{}/{}", base_uri.trim_end_matches('/'), module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_module_command() {
        let launch = translate("python mypkg.mod arg1 arg2", "s3://bucket/proj").unwrap();
        assert_eq!(launch.interpreter, Interpreter::Python);
        assert_eq!(launch.module_path, "s3://bucket/proj/mypkg.mod");
        assert_eq!(launch.args, "arg1 arg2");
        assert!(!launch.is_script());
    }

    #[test]
    fn test_translate_script_command() {
        let launch = translate("python train.py --epochs 10", "hdfs://nn/project").unwrap();
        assert_eq!(launch.module_path, "hdfs://nn/project/train.py");
        assert_eq!(launch.args, "--epochs 10");
        assert!(launch.is_script());
    }

    #[test]
    fn test_translate_no_args() {
        let launch = translate("python job.main", "").unwrap();
        assert_eq!(launch.module_path, "job.main");
        assert_eq!(launch.args, "");
    }

    #[test]
    fn test_base_uri_trailing_slash() {
        let launch = translate("python train.py", "s3://bucket/proj/").unwrap();
        assert_eq!(launch.module_path, "s3://bucket/proj/train.py");
    }

    #[test]
    fn test_unsupported_interpreter() {
        let err = translate("bash run.sh", "s3://bucket").unwrap_err();
        match err {
            BackendError::UnsupportedInterpreter(word) => assert_eq!(word, "bash"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_commands() {
        assert!(matches!(
            translate("", "s3://bucket").unwrap_err(),
            BackendError::MalformedCommand(_)
        ));
        assert!(matches!(
            translate("python", "s3://bucket").unwrap_err(),
            BackendError::MalformedCommand(_)
        ));
    }
}
