//! Line-based startup prompt.
//!
//! Asks for the seed coordinates and the session mode. The reader and writer
//! are generic so the prompt can be driven from a string in tests.

use std::io::{BufRead, Write};

use glam::DVec3;

use crate::error::PromptError;
use crate::session::Mode;

/// The answers given at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Startup {
    pub seed: DVec3,
    /// `None` when the mode answer was neither `v` nor `i`.
    pub mode: Option<Mode>,
}

/// Ask for x, y and z, then for the mode.
pub fn read_startup<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<Startup, PromptError> {
    let x = ask_coordinate(&mut input, &mut output, 'x')?;
    let y = ask_coordinate(&mut input, &mut output, 'y')?;
    let z = ask_coordinate(&mut input, &mut output, 'z')?;

    let choice = ask(
        &mut input,
        &mut output,
        "type 'v' for just visualize the simulation or 'i' in order to interact: ",
    )?;

    Ok(Startup {
        seed: DVec3::new(x, y, z),
        mode: Mode::from_choice(&choice),
    })
}

fn ask_coordinate<R: BufRead, W: Write>(input: &mut R, output: &mut W, axis: char) -> Result<f64, PromptError> {
    let answer = ask(input, output, &format!("type the first {} value: ", axis))?;
    let trimmed = answer.trim();
    trimmed.parse::<f64>().map_err(|source| PromptError::InvalidNumber {
        axis,
        input: trimmed.to_string(),
        source,
    })
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String, PromptError> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(PromptError::UnexpectedEof);
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(script: &str) -> (Result<Startup, PromptError>, String) {
        let mut out = Vec::new();
        let result = read_startup(Cursor::new(script), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_full_prompt() {
        let (result, out) = run("0\n1\n1.05\nv\n");
        let startup = result.unwrap();

        assert_eq!(startup.seed, DVec3::new(0.0, 1.0, 1.05));
        assert_eq!(startup.mode, Some(Mode::Viewer));
        assert!(out.starts_with("type the first x value: type the first y value: "));
        assert!(out.contains("'i' in order to interact"));
    }

    #[test]
    fn test_whitespace_and_case() {
        let (result, _) = run("  -2.5 \n3e1\n 7 \n  I  \n");
        let startup = result.unwrap();
        assert_eq!(startup.seed, DVec3::new(-2.5, 30.0, 7.0));
        assert_eq!(startup.mode, Some(Mode::Interactive));
    }

    #[test]
    fn test_unknown_mode_is_not_an_error() {
        let (result, _) = run("1\n2\n3\nquit\n");
        assert_eq!(result.unwrap().mode, None);
    }

    #[test]
    fn test_non_numeric_is_fatal() {
        let (result, out) = run("1\nabc\n3\nv\n");
        match result.unwrap_err() {
            PromptError::InvalidNumber { axis, input, .. } => {
                assert_eq!(axis, 'y');
                assert_eq!(input, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
        // Stops at the bad answer.
        assert!(!out.contains("z value"));
    }

    #[test]
    fn test_eof() {
        let (result, _) = run("1\n2\n");
        assert!(matches!(result.unwrap_err(), PromptError::UnexpectedEof));
    }
}
