//! Built-in scenario: four locations, three scripted decisions, the random
//! event deck and the local-news headline rules.

use crate::catalog::{
    Catalog, Choice, Condition, Decision, HeadlineRule, Location, ProgressMessage, RandomEvent,
};
use crate::consequence::{Consequence, Metric};

fn narrative(text: &str) -> Consequence {
    Consequence {
        narrative: text.to_string(),
        ..Consequence::default()
    }
}

fn choice(text: &str, consequence: Consequence) -> Choice {
    Choice {
        text: text.to_string(),
        consequence,
    }
}

#[allow(clippy::too_many_arguments)]
fn location(
    key: &str,
    flag: &str,
    name: &str,
    soil: &str,
    climate: &str,
    development_status: &str,
    economics: [i64; 5],
    crops: &[&str],
) -> Location {
    let [starting_debt, initial_money_penalty, base_pest_risk, initial_resilience, initial_infrastructure] =
        economics;
    Location {
        key: key.to_string(),
        flag: flag.to_string(),
        name: name.to_string(),
        soil: soil.to_string(),
        climate: climate.to_string(),
        development_status: development_status.to_string(),
        starting_debt,
        initial_money_penalty,
        base_pest_risk,
        initial_resilience,
        initial_infrastructure,
        common_crops: crops.iter().map(|c| c.to_string()).collect(),
    }
}

/// Locations; economics are `[debt, money penalty, pest risk, resilience, infrastructure]`.
pub fn locations() -> Vec<Location> {
    vec![
        location(
            "Japan - Yakushima",
            "🇯🇵",
            "Yakushima, Japan",
            "Humic Andosol (Volcanic Ash, High P-Fixation)",
            "Monsoon/High Humidity",
            "Developed",
            [60_000, 30_000, 15, 25, 50],
            &["Tankan Citrus", "Tea", "Rice (Paddy)"],
        ),
        location(
            "Central Asia - Steppe",
            "🇰🇿",
            "Kazakh Steppe",
            "Chernozem / Kastanozem (Dry Steppe)",
            "Semi-arid Continental",
            "Developing",
            [50_000, 20_000, -10, 10, 15],
            &["Wheat", "Alfalfa", "Cattle"],
        ),
        location(
            "East Africa - Highlands",
            "🇰🇪",
            "Kenyan Highlands",
            "Nitosols (Deep Red Clay)",
            "Tierra Fría (Highland)",
            "Developing",
            [35_000, 10_000, 5, 20, 10],
            &["Coffee", "Maize", "Beans"],
        ),
        location(
            "Siberia - Taiga",
            "🇷🇺",
            "Siberian Taiga",
            "Gelic Cambisol / Dystric Podzoluvisol (Permafrost)",
            "Cold Continental Taiga",
            "Developed",
            [20_000, 10_000, -20, 5, 10],
            &["Larch (Forestry)", "Potatoes", "Hay"],
        ),
    ]
}

pub fn decisions() -> Vec<Decision> {
    vec![
        Decision {
            week: 2,
            category: "🌱 4. Inputs & Resources".into(),
            prompt: "Your soil test is back. What nutrient strategy will you deploy for the season?"
                .into(),
            choices: vec![
                choice(
                    "Go all-in on cheap, high-synthetic urea (The 'Chemical Rush').",
                    Consequence {
                        money: -15_000,
                        environment: -20,
                        health_risk: 15,
                        hidden_pest_risk: 10,
                        ..narrative("You saved capital, but the land screams for justice. This guarantees quick growth but kills soil life.")
                    },
                ),
                choice(
                    "Use a balanced, high-quality conventional blend with some micronutrients.",
                    Consequence {
                        money: -25_000,
                        environment: -5,
                        health_risk: 5,
                        hidden_pest_risk: 5,
                        ..narrative("Moderate expense and moderate risk. A pragmatic, uninspired approach.")
                    },
                ),
                choice(
                    "Invest heavily in regenerative organic amendments and cover crops (The 'Dirt Hippie').",
                    Consequence {
                        money: -40_000,
                        environment: 25,
                        health_risk: -10,
                        hidden_pest_risk: -10,
                        hidden_stress: 15,
                        ..narrative("A massive expenditure, but your soil organisms are thriving. This strains cash flow but buys long-term resilience.")
                    },
                ),
                choice(
                    "Buy cheap fertilizer and *tell* customers it's organic (The 'Marketing Ploy').",
                    Consequence {
                        money: -5_000,
                        environment: -5,
                        health_risk: 25,
                        hidden_stress: 10,
                        ..narrative("Huge short-term profit, but if the local press finds out, your reputation is ruined.")
                    },
                ),
            ],
        },
        Decision {
            week: 6,
            category: "🌍 9. Environment & Subsidy Packages".into(),
            prompt: "The government offers a new environmental subsidy package. Do you enroll, sacrificing usable land for payments?".into(),
            choices: vec![
                choice(
                    "Accept the Full Gold Tier: Dedicate 20% of land to non-productive biodiversity (Max Subsidy).",
                    Consequence {
                        money: 30_000,
                        environment: 25,
                        hidden_stress: -15,
                        ..narrative("Guaranteed large income stream and huge environmental points. You are now a friend to the bees and the bureaucrats.")
                    },
                ),
                choice(
                    "Accept the Bronze Tier: Small change in practices for minimal payments.",
                    Consequence {
                        money: 5_000,
                        environment: 5,
                        hidden_stress: -5,
                        ..narrative("Easy compliance and a small cheque. No real impact, but you ticked the box.")
                    },
                ),
                choice(
                    "Reject the Subsidy: Keep all land in production, maximize raw yield potential.",
                    Consequence {
                        money: 15_000,
                        environment: -10,
                        hidden_stress: 10,
                        ..narrative("You bet on the market, maximizing crop space. Higher risk and stress, but potentially massive profits if the harvest is perfect.")
                    },
                ),
                choice(
                    "Enroll, but illegally farm the dedicated subsidy land anyway (The 'Double Dip').",
                    Consequence {
                        money: 45_000,
                        environment: -50,
                        hidden_stress: 50,
                        ..narrative("If you are caught, the fines and legal fees will destroy you. If not, maximum illegal profit.")
                    },
                ),
            ],
        },
        Decision {
            week: 12,
            category: "🚨 9. Environment & Operations".into(),
            prompt: "A severe pest outbreak requires immediate action. This is the moment of truth for your IPM strategy.".into(),
            choices: vec![
                choice(
                    "Blanket the field with cheap, broad-spectrum chemical spray (The 'Wipeout').",
                    Consequence {
                        money: -10_000,
                        environment: -30,
                        health_risk: 30,
                        hidden_pest_risk: -40,
                        ..narrative("The pests are annihilated, but so are the beneficial insects. You guaranteed residue and long-term ecosystem collapse.")
                    },
                ),
                choice(
                    "Use a highly targeted, expensive, low-toxicity biopesticide.",
                    Consequence {
                        money: -25_000,
                        environment: 5,
                        health_risk: -10,
                        hidden_pest_risk: -20,
                        ..narrative("A careful, costly approach. Pests are partially managed, but your ecological score is safe. A true trade-off.")
                    },
                ),
                choice(
                    "Do nothing and rely on natural enemies and crop resilience (The 'Zen Master').",
                    Consequence {
                        environment: 10,
                        hidden_pest_risk: 30,
                        ..narrative("You saved all the money and environmental points, but the pests are feasting. Your hidden Pest Risk just soared, guaranteeing lower yield.")
                    },
                ),
                choice(
                    "Quickly flood the field using old, inefficient pumps to drown the pests (Only viable if you have high Infrastructure/Resilience).",
                    Consequence {
                        money: -15_000,
                        environment: -15,
                        hidden_pest_risk: -35,
                        infrastructure_level: -20,
                        ..narrative("The pests are gone, but your pumps nearly died from the stress. Huge infrastructure wear and water waste.")
                    },
                ),
            ],
        },
    ]
}

/// Random event deck, scanned in order.
pub fn random_events() -> Vec<RandomEvent> {
    vec![
        RandomEvent {
            id: "pest-migration".into(),
            condition: Condition::Above {
                metric: Metric::HiddenPestRisk,
                value: 40,
            },
            risk: 0.3,
            consequence: Consequence {
                money: -3_000,
                hidden_pest_risk: 15,
                hidden_stress: 5,
                ..narrative("A swarm from the neighbour's untreated field moved in overnight. Scouting costs are piling up.")
            },
        },
        RandomEvent {
            id: "hailstorm".into(),
            condition: Condition::Below {
                metric: Metric::ClimateResilience,
                value: 30,
            },
            risk: 0.2,
            consequence: Consequence {
                money: -8_000,
                infrastructure_level: -10,
                hidden_stress: 10,
                ..narrative("A freak hailstorm shredded the polytunnels. Your climate resilience plan was mostly a sticky note.")
            },
        },
        RandomEvent {
            id: "pump-failure".into(),
            condition: Condition::Below {
                metric: Metric::InfrastructureLevel,
                value: 25,
            },
            risk: 0.2,
            consequence: Consequence {
                money: -5_000,
                infrastructure_level: -5,
                hidden_stress: 10,
                ..narrative("The irrigation pump gave up. Emergency repairs at weekend call-out rates.")
            },
        },
        RandomEvent {
            id: "burnout".into(),
            condition: Condition::Above {
                metric: Metric::HiddenStress,
                value: 60,
            },
            risk: 0.25,
            consequence: Consequence {
                money: -2_000,
                hidden_stress: 10,
                ..narrative("You slept through the market delivery slot. The buyer was not sympathetic.")
            },
        },
        RandomEvent {
            id: "price-spike".into(),
            condition: Condition::Always,
            risk: 0.1,
            consequence: Consequence {
                money: 6_000,
                hidden_stress: -5,
                ..narrative("A regional shortage pushed farm-gate prices up. You sold forward at exactly the right moment.")
            },
        },
    ]
}

/// Breaking-news rules, scanned in order against the committed consequence.
pub fn headlines() -> Vec<HeadlineRule> {
    vec![
        HeadlineRule {
            id: "residue-scandal".into(),
            condition: Condition::Above {
                metric: Metric::HealthRisk,
                value: 15,
            },
            headline: "Local Farm Linked to Chemical Residue Scare; Supermarket Pulls Produce".into(),
            penalty: Consequence {
                money: -10_000,
                health_risk: 5,
                hidden_stress: 10,
                ..Consequence::default()
            },
        },
        HeadlineRule {
            id: "runoff-exposed".into(),
            condition: Condition::Below {
                metric: Metric::Environment,
                value: -25,
            },
            headline: "River Turns Green Downstream of Farm; Council Opens Investigation".into(),
            penalty: Consequence {
                money: -8_000,
                hidden_stress: 15,
                ..Consequence::default()
            },
        },
        HeadlineRule {
            id: "farmer-meltdown".into(),
            condition: Condition::Above {
                metric: Metric::HiddenStress,
                value: 40,
            },
            headline: "Farmer Filmed Arguing With a Scarecrow; Video Goes Viral".into(),
            penalty: Consequence {
                money: -2_000,
                hidden_stress: 5,
                ..Consequence::default()
            },
        },
    ]
}

pub fn progress_messages() -> Vec<ProgressMessage> {
    [
        ("🚜", "Tilling, hauling and filling in subsidy forms"),
        ("🌦️", "Staring at the weather radar"),
        ("🐛", "Counting aphids on the lower leaves"),
        ("📒", "Reconciling the farm accounts"),
        ("💧", "Checking the irrigation lines"),
    ]
    .into_iter()
    .map(|(emoji, text)| ProgressMessage {
        emoji: emoji.to_string(),
        text: text.to_string(),
    })
    .collect()
}

impl Catalog {
    /// The scenario shipped with the game.
    pub fn builtin() -> Self {
        Self {
            locations: locations(),
            decisions: decisions(),
            random_events: random_events(),
            headlines: headlines(),
            progress_messages: progress_messages(),
        }
    }
}
