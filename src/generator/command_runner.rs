use crate::error::{MsgDepsError, Result};
use std::path::Path;
use std::process::Command;

/// Captured standard output of one successful generator invocation.
#[derive(Debug, Clone)]
pub struct GeneratorOutput {
    pub stdout: Vec<u8>,
}

impl GeneratorOutput {
    pub fn len(&self) -> u64 {
        self.stdout.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty()
    }
}

/// Produces dependency output for a single message file.
///
/// The trait is the seam between the per-file processing loop and the
/// external command, so the loop can be tested without spawning
/// processes.
pub trait DependencyGenerator {
    /// Run the generator for `source_file`, which lives under
    /// `source_root`. Returns the captured stdout on success.
    fn generate(&self, source_root: &Path, source_file: &Path) -> Result<GeneratorOutput>;

    /// Displayable form of the command this generator runs.
    fn describe(&self) -> String;
}

/// Invokes a configured external command, appending the source root and
/// the absolute file path as the final two positional arguments.
pub struct CommandGenerator {
    program: String,
    base_args: Vec<String>,
}

impl CommandGenerator {
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, base_args) = command.split_first().ok_or_else(|| MsgDepsError::Config {
            message: "Generator command must name a program to run".to_string(),
        })?;

        Ok(Self {
            program: program.clone(),
            base_args: base_args.to_vec(),
        })
    }
}

impl DependencyGenerator for CommandGenerator {
    fn generate(&self, source_root: &Path, source_file: &Path) -> Result<GeneratorOutput> {
        let output = Command::new(&self.program)
            .args(&self.base_args)
            .arg(source_root)
            .arg(source_file)
            .output()
            .map_err(|e| MsgDepsError::GeneratorLaunch {
                command: self.describe(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(MsgDepsError::GeneratorFailed {
                path: source_file.display().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr)
                    .trim_end()
                    .to_string(),
            });
        }

        Ok(GeneratorOutput {
            stdout: output.stdout,
        })
    }

    fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.base_args.iter().map(|s| s.as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sh_generator(script: &str) -> CommandGenerator {
        CommandGenerator::new(&[
            "sh".to_string(),
            "-c".to_string(),
            script.to_string(),
            "stub".to_string(),
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_empty_command() {
        let result = CommandGenerator::new(&[]);
        assert!(matches!(result, Err(MsgDepsError::Config { .. })));
    }

    #[test]
    fn test_describe_joins_program_and_args() {
        let generator =
            CommandGenerator::new(&["npx".to_string(), "gendeps2".to_string()]).unwrap();
        assert_eq!(generator.describe(), "npx gendeps2");
    }

    #[cfg(unix)]
    #[test]
    fn test_arguments_are_root_then_file() {
        // With `sh -c <script> stub`, $1 and $2 are the two appended paths.
        let generator = sh_generator("printf 'ROOT=%s FILE=%s' \"$1\" \"$2\"");

        let root = PathBuf::from("/tmp/src");
        let file = PathBuf::from("/tmp/src/a/b.msg");
        let output = generator.generate(&root, &file).unwrap();

        assert_eq!(
            String::from_utf8(output.stdout).unwrap(),
            "ROOT=/tmp/src FILE=/tmp/src/a/b.msg"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_surfaces_stderr() {
        let generator = sh_generator("echo boom >&2; exit 3");

        let result = generator.generate(Path::new("/tmp"), Path::new("/tmp/c.msg"));

        match result {
            Err(MsgDepsError::GeneratorFailed { path, stderr }) => {
                assert!(path.contains("c.msg"));
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected GeneratorFailed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_program_reports_launch_failure() {
        let generator =
            CommandGenerator::new(&["msgdeps-no-such-program-380145".to_string()]).unwrap();

        let result = generator.generate(Path::new("/tmp"), Path::new("/tmp/a.msg"));
        assert!(matches!(result, Err(MsgDepsError::GeneratorLaunch { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_stdout_is_captured_verbatim() {
        let generator = sh_generator("printf 'line one\\nline two\\n'");

        let output = generator
            .generate(Path::new("/tmp"), Path::new("/tmp/a.msg"))
            .unwrap();

        assert_eq!(output.stdout, b"line one\nline two\n");
        assert_eq!(output.len(), 18);
        assert!(!output.is_empty());
    }
}
