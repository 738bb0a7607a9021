use crate::store::CategorySelector;
use orbit::{Key, LayoutMode, TouchPoint};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Command(Command),
    ConfigReload,
    StoreReload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutRequest {
    Set(LayoutMode),
    Toggle,
}

/// One line of the control protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Next,
    Prev,
    GoTo(isize),
    Page(usize),
    Category(CategorySelector),
    Layout(LayoutRequest),
    Resize(u32),
    Wheel(f64),
    Swipe { from: TouchPoint, to: TouchPoint },
    Key(Key),
    Status,
}

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid argument '{value}' for '{command}'")]
    InvalidArgument {
        command: &'static str,
        value: String,
    },
}

fn arg<T: FromStr>(command: &'static str, value: Option<&str>) -> Result<T, CommandError> {
    let value = value.ok_or(CommandError::MissingArgument(command))?;
    value.parse().map_err(|_| CommandError::InvalidArgument {
        command,
        value: value.to_string(),
    })
}

/// Like `arg`, but NaN and infinities are rejected.
fn finite(command: &'static str, value: Option<&str>) -> Result<f64, CommandError> {
    let parsed: f64 = arg(command, value)?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(CommandError::InvalidArgument {
            command,
            value: value.unwrap_or_default().to_string(),
        })
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;

        let command = match name.to_ascii_lowercase().as_str() {
            "next" => Self::Next,
            "prev" => Self::Prev,
            "goto" => Self::GoTo(arg("goto", words.next())?),
            "page" => Self::Page(arg("page", words.next())?),
            "category" => {
                let rest = words.by_ref().collect::<Vec<_>>().join(" ");
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("category"));
                }
                Self::Category(arg("category", Some(rest.as_str()))?)
            }
            "layout" => match words.next() {
                Some(mode) if mode.eq_ignore_ascii_case("toggle") => {
                    Self::Layout(LayoutRequest::Toggle)
                }
                mode => Self::Layout(LayoutRequest::Set(arg("layout", mode)?)),
            },
            "resize" => Self::Resize(arg("resize", words.next())?),
            "wheel" => Self::Wheel(finite("wheel", words.next())?),
            "swipe" => {
                let mut coord = || finite("swipe", words.next());
                let from = TouchPoint::new(coord()?, coord()?);
                let to = TouchPoint::new(coord()?, coord()?);
                Self::Swipe { from, to }
            }
            "key" => Self::Key(arg("key", words.next())?),
            "status" => Self::Status,
            _ => return Err(CommandError::Unknown(name.to_string())),
        };

        match words.next() {
            Some(extra) => Err(CommandError::InvalidArgument {
                command: "trailing",
                value: extra.to_string(),
            }),
            None => Ok(command),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CategoryName;

    #[test]
    fn test_command_parsing() {
        let cases = vec![
            ("next", Command::Next),
            ("  PREV ", Command::Prev),
            ("goto -1", Command::GoTo(-1)),
            ("page 2", Command::Page(2)),
            ("category next", Command::Category(CategorySelector::Next)),
            (
                "category Social Media",
                Command::Category(CategorySelector::Name(CategoryName::new("Social Media"))),
            ),
            ("layout toggle", Command::Layout(LayoutRequest::Toggle)),
            (
                "layout Grid",
                Command::Layout(LayoutRequest::Set(LayoutMode::Grid)),
            ),
            ("resize 640", Command::Resize(640)),
            ("wheel -120.5", Command::Wheel(-120.5)),
            (
                "swipe 10 20 90 20",
                Command::Swipe {
                    from: TouchPoint::new(10.0, 20.0),
                    to: TouchPoint::new(90.0, 20.0),
                },
            ),
            ("key ArrowLeft", Command::Key(Key::ArrowLeft)),
            ("status", Command::Status),
        ];

        for (line, expected) in cases {
            assert_eq!(line.parse::<Command>().unwrap(), expected, "{line}");
        }
    }

    #[test]
    fn test_command_errors() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "jump".parse::<Command>(),
            Err(CommandError::Unknown("jump".to_string()))
        );
        assert_eq!(
            "page".parse::<Command>(),
            Err(CommandError::MissingArgument("page"))
        );
        assert!(matches!(
            "page -2".parse::<Command>(),
            Err(CommandError::InvalidArgument { .. })
        ));
        assert!("swipe 1 2 3".parse::<Command>().is_err());
        assert_eq!(
            "wheel NaN".parse::<Command>(),
            Err(CommandError::InvalidArgument {
                command: "wheel",
                value: "NaN".to_string(),
            })
        );
        assert!("wheel inf".parse::<Command>().is_err());
        assert!("swipe 0 0 -inf 0".parse::<Command>().is_err());
        assert!("next 3".parse::<Command>().is_err());
        assert!("layout sideways".parse::<Command>().is_err());
    }
}
