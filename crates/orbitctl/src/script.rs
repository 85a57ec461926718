use orbit::{DropPayload, Key, Point, UnknownKey, Viewport};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// One line of a driver script.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open(Point),
    Close,
    Toggle(Point),
    Move(Point),
    /// Hover update from an externally driven drag.
    Drag(Point),
    Down(Point),
    Up(Point),
    Click(Point),
    Key(Key),
    Scroll(f64),
    Wait(Duration),
    DropTarget(Point),
    Drop(DropPayload),
    CancelDrop,
    Back,
    Root,
    Viewport(Viewport),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{command}` expects {expected}")]
    BadArguments {
        command: String,
        expected: &'static str,
    },
    #[error(transparent)]
    Key(#[from] UnknownKey),
}

fn numbers<const N: usize>(
    command: &str,
    args: &[&str],
    expected: &'static str,
) -> Result<[f64; N], ScriptError> {
    let bad = || ScriptError::BadArguments {
        command: command.to_string(),
        expected,
    };
    if args.len() != N {
        return Err(bad());
    }
    let mut out = [0.0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(bad)?;
    }
    Ok(out)
}

fn point(command: &str, args: &[&str]) -> Result<Point, ScriptError> {
    let [x, y] = numbers(command, args, "X Y")?;
    Ok(Point::new(x, y))
}

impl FromStr for Command {
    type Err = ScriptError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<&str> = words.collect();
        let name = name.as_str();

        let command = match name {
            "open" => Self::Open(point(name, &args)?),
            "toggle" => Self::Toggle(point(name, &args)?),
            "move" => Self::Move(point(name, &args)?),
            "drag" => Self::Drag(point(name, &args)?),
            "down" => Self::Down(point(name, &args)?),
            "up" => Self::Up(point(name, &args)?),
            "click" => Self::Click(point(name, &args)?),
            "droptarget" => Self::DropTarget(point(name, &args)?),
            "close" => Self::Close,
            "canceldrop" => Self::CancelDrop,
            "back" => Self::Back,
            "root" => Self::Root,
            "key" => match args.as_slice() {
                [key] => Self::Key(key.parse()?),
                _ => {
                    return Err(ScriptError::BadArguments {
                        command: name.to_string(),
                        expected: "NAME",
                    });
                }
            },
            "scroll" => {
                let [delta] = numbers(name, &args, "DELTA")?;
                Self::Scroll(delta)
            }
            "wait" => {
                let [ms] = numbers(name, &args, "MS")?;
                Self::Wait(Duration::from_secs_f64(ms.max(0.0) / 1000.0))
            }
            "viewport" => {
                let [width, height] = numbers(name, &args, "W H")?;
                Self::Viewport(Viewport::new(width, height))
            }
            "drop" if !args.is_empty() => Self::Drop(DropPayload::new(args.join(" "))),
            "drop" => {
                return Err(ScriptError::BadArguments {
                    command: name.to_string(),
                    expected: "PAYLOAD",
                });
            }
            other => return Err(ScriptError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

/// Blank lines and `#` comments carry no command.
pub fn parse_line(line: &str) -> Option<Result<Command, ScriptError>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    Some(line.parse())
}
