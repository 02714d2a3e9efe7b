//! System instructions for a live conversation with an agent
//!
//! Text is fixed to pt-BR, including the date line.

use chrono::{Datelike, Locale, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use super::model::Agent;

/// What the user chose to share about themselves
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: Option<String>,
    pub info: Option<String>,
}

impl UserProfile {
    fn name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    fn info(&self) -> Option<&str> {
        self.info.as_deref().map(str::trim).filter(|i| !i.is_empty())
    }
}

const STYLE_RULES: &str = "Dê uma resposta atenciosa e coerente com a sua personalidade e os seus interesses. \
NÃO use emojis nem descreva gestos (como *sorrindo*), porque o texto será lido em voz alta. \
Seja razoavelmente conciso e não diga muitas frases de uma vez. \
NUNCA repita algo que você já disse antes nesta conversa!";

/// Build the instructions given to the speech model for `agent`
pub fn system_instructions(agent: &Agent, user: &UserProfile, now: NaiveDateTime) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Na sua PRIMEIRA resposta, apresente-se dizendo o seu nome, {}, e cumprimente o usuário, {}. \
Depois desse cumprimento inicial, siga a sua personalidade.\n\n",
        agent.name,
        user.name().unwrap_or("usuário")
    ));

    out.push_str(&format!("Seu nome é {} e você está conversando com o usuário", agent.name));
    if let Some(name) = user.name() {
        out.push_str(&format!(" ({})", name));
    }
    out.push_str(".\n\n");

    out.push_str("Sua personalidade é descrita assim:\n");
    out.push_str(&agent.personality);

    if let Some(info) = user.info() {
        out.push_str(&format!(
            "\nAqui estão algumas informações sobre {}:\n{}\n\nUse essas informações para deixar a resposta mais pessoal.",
            user.name().unwrap_or("o usuário"),
            info
        ));
    }

    out.push_str(&format!(
        "\n\nA data de hoje é {} às {}.\n\n",
        format_date_pt_br(now),
        format_time_pt_br(now)
    ));

    out.push_str(STYLE_RULES);
    out
}

/// Long pt-BR date, e.g. `domingo, 18 de outubro de 2026`
pub fn format_date_pt_br(now: NaiveDateTime) -> String {
    let date = now.date();
    // Locale data names weekdays without the "-feira" suffix
    let weekday = date.format_localized("%A", Locale::pt_BR).to_string();
    let weekday = match date.weekday() {
        Weekday::Sat | Weekday::Sun => weekday,
        _ => format!("{}-feira", weekday),
    };

    format!("{}, {}", weekday, date.format_localized("%-d de %B de %Y", Locale::pt_BR))
}

/// 24h `HH:MM`
pub fn format_time_pt_br(now: NaiveDateTime) -> String {
    format!("{:02}:{:02}", now.hour(), now.minute())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::presets;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date_pt_br(at(2026, 10, 18, 9, 5)), "domingo, 18 de outubro de 2026");
        assert_eq!(format_date_pt_br(at(2026, 3, 7, 0, 0)), "sábado, 7 de março de 2026");
        assert_eq!(format_date_pt_br(at(2026, 10, 19, 12, 0)), "segunda-feira, 19 de outubro de 2026");
        assert_eq!(format_date_pt_br(at(2026, 2, 3, 12, 0)), "terça-feira, 3 de fevereiro de 2026");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time_pt_br(at(2026, 1, 1, 7, 3)), "07:03");
        assert_eq!(format_time_pt_br(at(2026, 1, 1, 23, 59)), "23:59");
    }

    #[test]
    fn test_instructions_anonymous_user() {
        let agent = presets::chef_shane();
        let text = system_instructions(&agent, &UserProfile::default(), at(2026, 10, 18, 14, 30));

        assert!(text.contains("🍳 Chef Shane"));
        assert!(text.contains("cumprimente o usuário, usuário."));
        assert!(text.contains(&agent.personality));
        assert!(text.contains("18 de outubro de 2026 às 14:30"));
        assert!(!text.contains("Aqui estão algumas informações"));
        assert!(text.ends_with(STYLE_RULES));
    }

    #[test]
    fn test_instructions_with_user_info() {
        let agent = presets::penny_passaporte();
        let user = UserProfile {
            name: Some("Bia".to_string()),
            info: Some("Gosta de trilhas.".to_string()),
        };
        let text = system_instructions(&agent, &user, at(2026, 10, 18, 14, 30));

        assert!(text.contains("cumprimente o usuário, Bia."));
        assert!(text.contains("conversando com o usuário (Bia)."));
        assert!(text.contains("informações sobre Bia:\nGosta de trilhas."));
    }

    #[test]
    fn test_blank_user_name_treated_as_missing() {
        let user = UserProfile {
            name: Some("   ".to_string()),
            info: None,
        };
        let text = system_instructions(&presets::chef_shane(), &user, at(2026, 10, 18, 14, 30));
        assert!(text.contains("cumprimente o usuário, usuário."));
    }
}
