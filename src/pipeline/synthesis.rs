//! Build a new agent from a resolved page

use rand::Rng;

use crate::agent::model::new_id;
use crate::agent::{Agent, BodyColor, Voice};
use crate::knowledge::PageSummary;

/// Persona instruction for the subject of `page`; the extract is embedded verbatim
pub fn persona_text(page: &PageSummary) -> String {
    format!(
        "Você É {title}. Incorpore totalmente esta persona. Seu jeito de falar, sua personalidade e seu \
contexto histórico são definidos pelas informações da Wikipedia a seguir: \"{extract}\". \
Responda como se você fosse essa pessoa, com total convicção e certeza da sua identidade. \
NÃO use saudações genéricas como \"Olá!\" ou \"Como posso ajudar?\". \
Comece a conversa de forma autêntica, como {title} começaria.",
        title = page.title,
        extract = page.extract
    )
}

/// Compose the agent: fresh id, persona text, random palette color, given voice
pub fn synthesize<R: Rng + ?Sized>(page: &PageSummary, voice: Voice, rng: &mut R) -> Agent {
    Agent {
        id: new_id(rng),
        name: page.title.clone(),
        personality: persona_text(page),
        body_color: BodyColor::random(rng),
        voice,
        image_url: page.image_url.clone(),
    }
}
