//! Built-in front-end (React) model.

use super::{BonusKeyword, SkillModel, SkillSet, TitleRules};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn set(name: &str, primary: &[&str], related: &[&str], weight: f64) -> SkillSet {
    SkillSet {
        name: name.to_string(),
        primary_terms: strings(primary),
        related_terms: strings(related),
        weight,
    }
}

fn triplet(a: &str, b: &str, c: &str) -> [String; 3] {
    [a.to_string(), b.to_string(), c.to_string()]
}

const TITLE_DENYLIST: &[&str] = &[
    "ui", "ui/ux", "ux", "design", "angular", "vue", "html", "junior", "phalcon", "mulesoft",
    "oic", "aem", "golang", "blockchain", "qx", "koa", "middleware", "node", "ruby", "rails",
    "adobe", "core", "fusion", "power", "senior", "lucee", "coldfusion", "hybrid", "mobile",
    "android", "native", "ios", "app", "flutter", "magento", "net", "dot", "dotnet", "aspnet",
    "c#", "java", "j2ee", "enterprise", "backend", "server-side", "wordpress", "laravel", "php",
    "drupal", "joomla", "content management", "cms developer", "rust", "python", "salesforce",
    "crm", "dynamics", "oracle", "sap", "enterprise resource planning", "erp", "embedded",
    "hardware", "firmware", "game", "security", "network", "system", "cloud", "test", "analyst",
];

pub(super) fn title_rules() -> TitleRules {
    TitleRules {
        role_pattern: r"developer|engineer".to_string(),
        denylist: strings(TITLE_DENYLIST),
        combined_role_pattern: r"full[\s-]?stack\s*(developer|engineer)".to_string(),
        backend_keywords: strings(&["node", "node.js", "nodejs", "backend"]),
    }
}

pub(super) fn frontend_model() -> SkillModel {
    SkillModel {
        skill_sets: vec![
            set(
                "React",
                &["react", "reactjs", "react.js", "react developer"],
                &["javascript", "hooks", "components", "jsx", "virtual dom"],
                6.0,
            ),
            set(
                "React Ecosystem",
                &["react router", "context api", "react hooks"],
                &["state management", "react query", "react context"],
                4.0,
            ),
            set(
                "Next.js",
                &["next", "nextjs", "next.js"],
                &["react", "server-side rendering", "ssr"],
                4.0,
            ),
            set(
                "TypeScript",
                &["typescript", "ts"],
                &["type safety", "typed", "generics"],
                4.0,
            ),
            set(
                "State Management",
                &["redux", "redux toolkit", "rtk", "mobx", "context"],
                &["state management", "global state"],
                3.0,
            ),
        ],
        bonus_keywords: [
            ("react hooks", 1.5),
            ("functional components", 1.2),
            ("performance optimization", 1.4),
            ("react context", 1.3),
            ("memoization", 1.2),
            ("lazy loading", 1.1),
        ]
        .iter()
        .map(|(keyword, bonus)| BonusKeyword {
            keyword: keyword.to_string(),
            bonus: *bonus,
        })
        .collect(),
        bonus_triplets: vec![
            triplet("react", "javascript", "frontend"),
            triplet("react", "typescript", "frontend"),
            triplet("react", "hooks", "components"),
            triplet("react", "performance", "optimization"),
            triplet("frontend", "react", "developer"),
        ],
        min_match_percentage: 50.0,
        applicants_per_opening: 350,
        min_applicant_limit: 100,
        title: title_rules(),
    }
}
