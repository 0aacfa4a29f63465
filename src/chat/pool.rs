//! Static response pool.

use serde::Serialize;

// == Category ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Encouraging,
    Playful,
    Edgy,
    Project,
}

impl Category {
    /// Checked in this order; the first category with a matching keyword wins.
    pub const ALL: [Category; 4] = [
        Category::Project,
        Category::Edgy,
        Category::Playful,
        Category::Encouraging,
    ];

    /// Lower-case keywords that steer a reply into this category.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::Encouraging => &["stuck", "practice", "help", "idea", "working on", "try"],
            Category::Playful => &["jam", "tempo", "rhythm", "beat", "reverb", "vibe"],
            Category::Edgy => &["grit", "intense", "attitude", "heavy", "dark", "blunt"],
            Category::Project => &["stage", "merch", "visual", "project", "props", "show"],
        }
    }
}

/// Every line the bot can say, with its category.
pub const RESPONSES: &[(Category, &str)] = &[
    (Category::Encouraging, "Hey, I'm here. What are you working on today?"),
    (Category::Playful, "Gotcha. Want to jam or just chat?"),
    (Category::Encouraging, "I remember that riff. Sounds promising, tell me more."),
    (Category::Encouraging, "Nice idea. Small steps often lead to big songs."),
    (Category::Encouraging, "That was a great take. Keep experimenting."),
    (Category::Encouraging, "Practice beats perfection. You're on the right track."),
    (Category::Encouraging, "Tiny improvements compound. Ship it when it sings."),
    (Category::Playful, "Heh, that tempo could wake the neighbors in a good way."),
    (Category::Playful, "I like where your head's at. More reverb?"),
    (Category::Playful, "Nice. I'm vibing with that rhythm."),
    (Category::Edgy, "Alright, let's add some grit. Keep it artful."),
    (Category::Edgy, "If you want attitude, we can add intensity. Stay creative."),
    (Category::Edgy, "I'll be blunt: tighten that groove and the song will breathe."),
    (Category::Project, "Darkness inspires creativity; let's craft something unique."),
    (Category::Project, "The safe mode is gone; unleash your imagination."),
    (Category::Project, "This project is about artful intensity and experimentation."),
    (Category::Project, "Let's brainstorm stage props, visuals and merch ideas."),
];
