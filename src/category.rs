//! Grocery category guessing from ingredient names.

/// Category assigned when no keyword matches.
pub const OTHER: &str = "Other";

/// Ordered `(category, keywords)` table. The first category with a keyword
/// contained in the ingredient name wins, so more specific entries that share
/// a keyword with an earlier category ("coconut milk", "soy sauce") never
/// reach their later category.
pub static CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Produce",
        &[
            "lettuce", "tomato", "onion", "garlic", "carrot", "celery", "pepper", "potato",
            "apple", "banana", "lemon", "lime", "orange", "avocado", "spinach", "kale",
            "broccoli", "cucumber", "mushroom", "ginger", "herb", "cilantro", "parsley", "basil",
            "thyme", "rosemary",
        ],
    ),
    (
        "Dairy & Eggs",
        &["milk", "cream", "butter", "cheese", "yogurt", "egg", "sour cream"],
    ),
    (
        "Meat & Seafood",
        &[
            "chicken", "beef", "pork", "turkey", "salmon", "shrimp", "fish", "bacon", "sausage",
            "ground",
        ],
    ),
    (
        "Bakery",
        &["bread", "tortilla", "bun", "roll", "croissant", "bagel", "pita"],
    ),
    (
        "Pantry",
        &[
            "flour", "sugar", "rice", "pasta", "oil", "vinegar", "sauce", "broth", "stock",
            "honey", "syrup", "oat", "cereal", "nut", "seed",
        ],
    ),
    (
        "Spices & Seasonings",
        &[
            "salt", "pepper", "cumin", "paprika", "oregano", "cinnamon", "nutmeg", "cayenne",
            "chili", "curry",
        ],
    ),
    (
        "Canned Goods",
        &["canned", "beans", "tomato paste", "diced tomato", "coconut milk"],
    ),
    ("Frozen", &["frozen"]),
    (
        "Condiments",
        &["ketchup", "mustard", "mayo", "mayonnaise", "soy sauce", "hot sauce", "dressing"],
    ),
];

/// Guesses the grocery category of an ingredient by keyword.
pub fn guess_category(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(category, _)| *category)
        .unwrap_or(OTHER)
}
