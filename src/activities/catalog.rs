use crate::models::{Activity, Mood};

const DEFAULT_DURATION_MINUTES: u32 = 5;

/// One built-in catalog entry.
struct Row {
    id: &'static str,
    name: &'static str,
    icon: &'static str,
    description: &'static str,
    duration: &'static str,
}

const HAPPY: [Row; 8] = [
    Row {
        id: "happy1",
        name: "Dance to your favorite song",
        icon: "music",
        description: "Move to the beat and express your joy through movement! Dancing releases endorphins and amplifies your positive mood.",
        duration: "5 min",
    },
    Row {
        id: "happy2",
        name: "Share your positivity",
        icon: "heart",
        description: "Call or message someone you care about to spread the good mood. Sharing positive emotions strengthens social bonds.",
        duration: "10 min",
    },
    Row {
        id: "happy3",
        name: "Try something new",
        icon: "activity",
        description: "Use this positive energy to explore a new activity or hobby. Your brain is more receptive to learning when you're in a good mood.",
        duration: "15-30 min",
    },
    Row {
        id: "happy4",
        name: "Creative expression",
        icon: "edit",
        description: "Channel your positive energy into art, writing, or another creative outlet. Creativity flows more easily when you're feeling good.",
        duration: "20 min",
    },
    Row {
        id: "happy5",
        name: "Random act of kindness",
        icon: "sparkles",
        description: "Do something nice for someone else. Acts of kindness while you're happy can create a positive ripple effect.",
        duration: "5-15 min",
    },
    Row {
        id: "happy6",
        name: "Set a new goal",
        icon: "pen-tool",
        description: "Your positive mood is a great time to think about what you want to achieve next. Write down a new goal and the first steps to get there.",
        duration: "10 min",
    },
    Row {
        id: "happy7",
        name: "Outdoor adventure",
        icon: "sun",
        description: "Go outside and enjoy nature. Whether it's a walk in the park or sitting in your garden, fresh air enhances your good mood.",
        duration: "15-30 min",
    },
    Row {
        id: "happy8",
        name: "Social connection",
        icon: "users",
        description: "Reach out to friends or family to share your good mood. Positive emotions are contagious!",
        duration: "15 min",
    },
];

const SAD: [Row; 8] = [
    Row {
        id: "sad1",
        name: "Gentle yoga stretch",
        icon: "activity",
        description: "A few minutes of gentle movement can help shift your mood. Try some simple stretches to release tension in your body.",
        duration: "5 min",
    },
    Row {
        id: "sad2",
        name: "Mindful breathing",
        icon: "moon",
        description: "Take 5 deep breaths, focusing on how your body feels. Breathe in for 4 counts, hold for 2, and exhale for 6 counts.",
        duration: "3 min",
    },
    Row {
        id: "sad3",
        name: "Comfort break",
        icon: "coffee",
        description: "Make yourself a warm drink and take a moment to relax. Sometimes a small comfort can make a big difference.",
        duration: "10 min",
    },
    Row {
        id: "sad4",
        name: "Nature connection",
        icon: "sun",
        description: "Step outside or look out a window at the natural world for a few minutes. Nature has a calming effect on our emotions.",
        duration: "5 min",
    },
    Row {
        id: "sad5",
        name: "Hydration refresh",
        icon: "droplet",
        description: "Drink a glass of water. Staying hydrated can have a surprising impact on mood and energy levels.",
        duration: "2 min",
    },
    Row {
        id: "sad6",
        name: "Soothing sounds",
        icon: "music",
        description: "Listen to calming music or nature sounds. Audio can help shift your emotional state gently.",
        duration: "7 min",
    },
    Row {
        id: "sad7",
        name: "Cozy comfort",
        icon: "umbrella",
        description: "Wrap yourself in a soft blanket or put on comfortable clothes. Physical comfort can help ease emotional discomfort.",
        duration: "5 min",
    },
    Row {
        id: "sad8",
        name: "Emotion journaling",
        icon: "edit",
        description: "Write down how you're feeling without judgment. Acknowledging emotions can help process them more effectively.",
        duration: "10 min",
    },
];

const NEUTRAL: [Row; 8] = [
    Row {
        id: "neutral1",
        name: "Quick energy boost",
        icon: "activity",
        description: "Try 10 jumping jacks to get your blood flowing. A burst of movement can help shift your energy level.",
        duration: "1 min",
    },
    Row {
        id: "neutral2",
        name: "Gratitude moment",
        icon: "heart",
        description: "Think of three things you're grateful for right now. Gratitude practice has been shown to increase positive emotions.",
        duration: "2 min",
    },
    Row {
        id: "neutral3",
        name: "Creative expression",
        icon: "music",
        description: "Doodle, hum, or write for a few minutes to spark creativity. Even small creative acts can shift your mood.",
        duration: "5 min",
    },
    Row {
        id: "neutral4",
        name: "Quick read",
        icon: "book",
        description: "Read a short article or a few pages of a book to stimulate your mind and potentially shift your perspective.",
        duration: "10 min",
    },
    Row {
        id: "neutral5",
        name: "Mindful moment",
        icon: "brain",
        description: "Take a minute to focus on your surroundings. Notice 5 things you can see, 4 things you can touch, 3 things you can hear, 2 things you can smell, and 1 thing you can taste.",
        duration: "3 min",
    },
    Row {
        id: "neutral6",
        name: "Quick walk",
        icon: "bike",
        description: "Take a short walk around your space or outside. Moving your body can help shift your mental state.",
        duration: "5 min",
    },
    Row {
        id: "neutral7",
        name: "Facial relaxation",
        icon: "smile",
        description: "Gently massage your face or try smiling for 30 seconds. Facial expressions can influence how we feel.",
        duration: "2 min",
    },
    Row {
        id: "neutral8",
        name: "Deep breathing",
        icon: "cloud-rain",
        description: "Take 10 deep breaths, focusing on the sensation of air moving in and out of your body.",
        duration: "2 min",
    },
];

/// Minutes from a label like "15-30 min": the first run of digits, or 5 when
/// there is none.
pub fn parse_duration_minutes(label: &str) -> u32 {
    let digits: String = label
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(DEFAULT_DURATION_MINUTES)
}

/// Read-only activity reference data.
#[derive(Debug, Clone)]
pub struct Catalog {
    activities: Vec<Activity>,
}

impl Catalog {
    pub fn builtin() -> Self {
        let rows = HAPPY
            .iter()
            .map(|row| (Mood::Happy, row))
            .chain(SAD.iter().map(|row| (Mood::Sad, row)))
            .chain(NEUTRAL.iter().map(|row| (Mood::Neutral, row)));

        let activities = rows
            .map(|(mood, row)| Activity {
                id: row.id.to_string(),
                name: row.name.to_string(),
                description: row.description.to_string(),
                duration_minutes: parse_duration_minutes(row.duration),
                duration_label: row.duration.to_string(),
                icon: row.icon.to_string(),
                mood,
            })
            .collect();

        Self { activities }
    }

    pub fn from_activities(activities: Vec<Activity>) -> Self {
        Self { activities }
    }

    pub fn all(&self) -> &[Activity] {
        &self.activities
    }

    pub fn for_mood(&self, mood: Mood) -> impl Iterator<Item = &Activity> + '_ {
        self.activities.iter().filter(move |a| a.mood == mood)
    }

    pub fn get(&self, id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
