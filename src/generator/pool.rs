// Exercise pool - Named exercise categories the generator draws from

/// A labelled group of exercise names
#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub label: &'static str,
    pub exercises: &'static [&'static str],
}

pub const WARMUP: Category = Category {
    label: "WARMUP",
    exercises: &[
        "Jumping jacks",
        "Arm circles",
        "High knees",
        "Shoulder rolls",
        "Hip circles",
        "Leg swings",
        "Ankle rolls",
        "Torso twists",
        "Butt kicks",
        "Wrist rotations",
        "Chest openers",
        "Walking lunges",
        "Bodyweight squats",
        "Scapula push-ups",
        "Inchworms",
        "Arm swings",
        "Upper back rotations",
    ],
};

pub const HIIT: Category = Category {
    label: "HIIT",
    exercises: &[
        "Burpees",
        "Mountain climbers",
        "Jump squats",
        "Push-ups",
        "Skater hops",
        "Plank jacks",
        "Tuck jumps",
        "Speed skaters",
        "Sprint in place",
        "Jumping lunges",
        "Bicycle crunches",
        "Star jumps",
        "Bear crawl",
        "Lateral shuffles",
    ],
};

pub const UPPER_BODY: Category = Category {
    label: "UPPER BODY",
    exercises: &[
        "Push-ups",
        "Diamond push-ups",
        "Pike push-ups",
        "Tricep dips",
        "Plank shoulder taps",
        "Arm circles",
        "Superman back raises",
        "Plank up-downs",
        "Wide push-ups",
        "Chest punches",
        "Shoulder press",
        "Back rows",
    ],
};

pub const LOWER_BODY: Category = Category {
    label: "LOWER BODY",
    exercises: &[
        "Jump squats",
        "Reverse lunges",
        "Glute bridges",
        "Wall sit",
        "Calf raises",
        "Side lunges",
        "Sumo squats",
        "Single leg glute bridges",
        "Squat pulses",
        "Step-ups",
        "Curtsy lunges",
        "Hip thrusts",
    ],
};

pub const COOLDOWN: Category = Category {
    label: "COOLDOWN",
    exercises: &[
        "Quad stretch",
        "Hamstring stretch",
        "Shoulder stretch",
        "Chest stretch",
        "Tricep stretch",
        "Child's pose",
        "Hip flexor stretch",
        "Calf stretch",
        "Glute stretch",
        "Upper back stretch",
        "Wrist stretch",
        "Ankle mobility",
        "Cat cow",
    ],
};

/// Keywords matching exercises that load the upper body
pub const UPPER_KEYWORDS: &[&str] = &[
    "arm", "shoulder", "chest", "push", "tricep", "back", "plank", "upper", "wrist", "scapula",
];

/// Keywords matching exercises that load the lower body
pub const LOWER_KEYWORDS: &[&str] = &[
    "leg", "squat", "lunge", "glute", "ankle", "hip", "calf", "hamstring", "quad",
];

/// Exercises whose name contains any of `keywords` (case-insensitive).
/// An empty keyword list keeps the whole category.
pub fn filter_by_keywords(category: &Category, keywords: &[&str]) -> Vec<&'static str> {
    if keywords.is_empty() {
        return category.exercises.to_vec();
    }
    category
        .exercises
        .iter()
        .copied()
        .filter(|name| {
            let lower = name.to_lowercase();
            keywords.iter().any(|k| lower.contains(k))
        })
        .collect()
}
