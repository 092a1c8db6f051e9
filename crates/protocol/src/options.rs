pub const DEPARTMENTS: &[&str] = &[
    "Human Resources",
    "Finance",
    "Operations",
    "Customer Service",
    "Marketing",
    "Sales",
    "IT / Technology",
    "Legal",
    "Risk & Compliance",
    "Other",
];

pub const AI_TECHNIQUES: &[&str] = &[
    "Machine Learning (Classification/Regression)",
    "Natural Language Processing (NLP)",
    "Generative AI / Large Language Models",
    "Computer Vision",
    "Recommendation Systems",
    "Robotic Process Automation (RPA)",
    "Predictive Analytics",
    "Multiple / Hybrid",
];

pub const STAGES: &[&str] = &[
    "Ideation / Concept",
    "Development / POC",
    "Pilot / Testing",
    "Production (Limited)",
    "Production (Full Scale)",
];

pub const MARKETS: &[&str] = &[
    "United States",
    "European Union",
    "Canada",
    "United Kingdom",
    "Asia Pacific",
    "Latin America",
    "Global",
];

pub const DATA_TYPES: &[&str] = &[
    "Personal Identifiable Information (PII)",
    "Employee / HR Data",
    "Financial Data",
    "Health Information",
    "Biometric Data",
    "Customer Behavior Data",
    "Public Data Only",
    "Synthetic / Anonymized",
];

/// Frameworks the evaluation prompt asks the model to consider.
pub const FRAMEWORKS: &[&str] = &[
    "EU AI Act",
    "Colorado AI Act",
    "NYC Local Law 144",
    "GDPR",
];
