//! Argument parsing.
//!
//! Parsing goes through [`Parser::try_parse_from`], so clap never exits the
//! process itself. Every rejection, including `--help`, becomes
//! [`CliError::Usage`]: usage text on stdout and exit code 1.

use std::ffi::OsString;

use clap::Parser;
use tracing::debug;

use crate::error::CliError;

/// Raw argument shape accepted by clap.
#[derive(Debug, Parser)]
#[command(name = "kots-decryptor", about, long_about = None)]
struct Args {
    /// Print a freshly generated cipher descriptor
    #[arg(long, conflicts_with_all = ["encrypt", "cipher", "value"])]
    generate: bool,

    /// Seal PLAINTEXT with CIPHER and print the base64 value
    #[arg(
        long,
        num_args = 2,
        value_names = ["CIPHER", "PLAINTEXT"],
        allow_hyphen_values = true,
        conflicts_with_all = ["cipher", "value"]
    )]
    encrypt: Option<Vec<String>>,

    /// Base64 cipher descriptor
    #[arg(value_name = "CIPHER")]
    cipher: Option<String>,

    /// Base64 encrypted value
    #[arg(value_name = "ENCRYPTED_VALUE")]
    value: Option<String>,
}

/// A validated invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `<cipher> <encrypted value>`: print the plaintext.
    Decrypt { cipher: String, value: String },
    /// `--encrypt <cipher> <plaintext>`: print base64 of `ciphertext || tag`.
    Encrypt { cipher: String, plaintext: String },
    /// `--generate`: print a fresh descriptor.
    Generate,
}

/// Parse the process arguments, program name first.
///
/// # Errors
///
/// Returns [`CliError::Usage`] for any other shape, including non-UTF-8
/// arguments.
pub fn parse<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = OsString>,
{
    let args = Args::try_parse_from(args).map_err(|e| {
        debug!(kind = ?e.kind(), "arguments rejected");
        CliError::Usage
    })?;

    match args {
        Args { generate: true, .. } => Ok(Command::Generate),
        Args {
            encrypt: Some(pair),
            ..
        } => match <[String; 2]>::try_from(pair) {
            Ok([cipher, plaintext]) => Ok(Command::Encrypt { cipher, plaintext }),
            Err(_) => Err(CliError::Usage),
        },
        Args {
            cipher: Some(cipher),
            value: Some(value),
            ..
        } => Ok(Command::Decrypt { cipher, value }),
        _ => Err(CliError::Usage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_strs(args: &[&str]) -> Result<Command, CliError> {
        parse(
            std::iter::once("kots-decryptor")
                .chain(args.iter().copied())
                .map(OsString::from),
        )
    }

    #[test]
    fn two_positionals_decrypt() {
        assert_eq!(
            parse_strs(&["abc=", "def="]).unwrap(),
            Command::Decrypt {
                cipher: "abc=".into(),
                value: "def=".into(),
            }
        );
    }

    #[test]
    fn generate_flag() {
        assert_eq!(parse_strs(&["--generate"]).unwrap(), Command::Generate);
    }

    #[test]
    fn encrypt_flag() {
        assert_eq!(
            parse_strs(&["--encrypt", "abc=", "hello"]).unwrap(),
            Command::Encrypt {
                cipher: "abc=".into(),
                plaintext: "hello".into(),
            }
        );
    }

    #[test]
    fn encrypt_plaintext_may_start_with_hyphen() {
        assert_eq!(
            parse_strs(&["--encrypt", "abc=", "-n"]).unwrap(),
            Command::Encrypt {
                cipher: "abc=".into(),
                plaintext: "-n".into(),
            }
        );
    }

    #[test]
    fn wrong_counts_are_usage_errors() {
        for args in [
            &[][..],
            &["only-one"][..],
            &["a", "b", "c"][..],
            &["--encrypt", "abc="][..],
            &["--generate", "extra"][..],
            &["--generate", "abc=", "def="][..],
            &["--encrypt", "abc=", "hello", "extra"][..],
        ] {
            assert!(
                matches!(parse_strs(args), Err(CliError::Usage)),
                "{args:?}"
            );
        }
    }

    #[test]
    fn unknown_flags_are_usage_errors() {
        for args in [&["--help"][..], &["--decrypt", "abc="][..]] {
            assert!(
                matches!(parse_strs(args), Err(CliError::Usage)),
                "{args:?}"
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_is_usage_error() {
        use std::os::unix::ffi::OsStringExt;
        let bad = OsString::from_vec(vec![0xff, 0xfe]);
        assert!(matches!(
            parse(vec![
                OsString::from("kots-decryptor"),
                bad,
                OsString::from("x")
            ]),
            Err(CliError::Usage)
        ));
    }
}
