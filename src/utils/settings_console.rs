use anyhow::{anyhow, bail, Result};
use crossbeam_channel::{unbounded, Receiver};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use log::{debug, warn};
use std::io::BufRead;
use std::path::PathBuf;
use std::str::FromStr;

use crate::physic_engine::config::{SettingKey, SettingsPatch};

pub const HELP: &str = "\
Commands:
  set <key> <value> [<key> <value> ...]   (or key=value)
  get <key>
  show                  print all settings
  start | stop | toggle animation loop
  reload                re-read the settings file
  save [path]           write settings (default: settings file)
  help";

/// Commande du console de réglages, une par ligne saisie.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Set(SettingsPatch),
    Get(SettingKey),
    Show,
    Start,
    Stop,
    Toggle,
    Reload,
    Save(Option<PathBuf>),
    Help,
}

/// Nom de réglage le plus proche de `input`, pour les messages "did you mean".
pub fn suggest_setting(input: &str) -> Option<&'static str> {
    let matcher = SkimMatcherV2::default();
    let input = input.to_lowercase();

    SettingKey::ALL
        .iter()
        .filter_map(|k| {
            let name = k.name();
            let compact = name.replace('_', "");
            // dans les deux sens : abréviation ("emx") ou saisie trop longue ("emitter_x_pos")
            [
                matcher.fuzzy_match(name, &input),
                matcher.fuzzy_match(&compact, &input),
                matcher.fuzzy_match(&input, &compact),
            ]
            .into_iter()
            .flatten()
            .max()
            .map(|score| (score, name))
        })
        .max_by_key(|(score, _)| *score)
        .map(|(_, name)| name)
}

fn parse_key(raw: &str) -> Result<SettingKey> {
    raw.parse::<SettingKey>().map_err(|e| match suggest_setting(raw) {
        Some(hint) => anyhow!("{} (did you mean '{}'?)", e, hint),
        None => e,
    })
}

fn parse_assignments<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Result<SettingsPatch> {
    let mut patch = SettingsPatch::default();

    while let Some(token) = tokens.next() {
        let (key, value) = match token.split_once('=') {
            Some((k, v)) => (k, v.to_string()),
            None => {
                let value = tokens
                    .next()
                    .ok_or_else(|| anyhow!("missing value for '{}'", token))?;
                (token, value.to_string())
            }
        };
        patch.set(parse_key(key)?, &value)?;
    }

    if patch.is_empty() {
        bail!("usage: set <key> <value>");
    }
    Ok(patch)
}

impl FromStr for ConsoleCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        let Some(verb) = tokens.next() else {
            bail!("empty command");
        };

        match verb.to_lowercase().as_str() {
            "set" => Ok(Self::Set(parse_assignments(tokens)?)),
            "get" => {
                let key = tokens.next().ok_or_else(|| anyhow!("usage: get <key>"))?;
                Ok(Self::Get(parse_key(key)?))
            }
            "show" => Ok(Self::Show),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "toggle" => Ok(Self::Toggle),
            "reload" => Ok(Self::Reload),
            "save" => Ok(Self::Save(tokens.next().map(PathBuf::from))),
            "help" | "?" => Ok(Self::Help),
            other => bail!("unknown command '{}', type 'help'", other),
        }
    }
}

/// Lit stdin ligne par ligne dans un thread dédié.
///
/// Les lignes sont transmises brutes : le simulateur les interprète entre
/// deux frames, sur son propre thread.
pub fn spawn_stdin_reader() -> Result<Receiver<String>> {
    let (tx, rx) = unbounded();

    std::thread::Builder::new()
        .name("settings-console".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) if line.trim().is_empty() => continue,
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("stdin closed: {}", e);
                        break;
                    }
                }
            }
            debug!("settings console reader finished");
        })?;

    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggest_setting() {
        assert_eq!(suggest_setting("emitrad"), Some("emitter_radius"));
        assert_eq!(suggest_setting("midsize"), Some("middle_size"));
    }

    #[test]
    fn test_parse_key_with_hint() {
        let err = parse_key("emitrad").unwrap_err().to_string();
        assert!(err.contains("did you mean 'emitter_radius'"), "{}", err);
    }
}
