//! Static educational content shown alongside the assessment tools.

pub const APP_TITLE: &str = "Tech Powered Approaches to Safe & Green Aquaculture";

pub const SIDEBAR_INFO: &str = "Offline AI system for safe & green aquaculture.";

pub const FOOTER: [&str; 3] = [
    "Tech Powered Aquaculture",
    "Offline YOLOv8 Based Detection System",
    "Educational & Research Use",
];

pub struct Section {
    pub heading: &'static str,
    pub items: &'static [&'static str],
}

pub const PPE_HEADING: &str = "Personal Protective Equipment (PPE)";

pub const PPE_SECTIONS: [Section; 2] = [
    Section {
        heading: "Why PPE is Important",
        items: &[
            "Protection from biological hazards",
            "Prevents chemical exposure",
            "Reduces physical injuries",
            "Ensures worker safety in wet conditions",
        ],
    },
    Section {
        heading: "Recommended PPE",
        items: &[
            "Waterproof Gloves",
            "Rubber Boots",
            "Safety Goggles",
            "Face Masks",
            "Protective Aprons",
            "Waterproof Jackets",
        ],
    },
];
