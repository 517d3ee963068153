//! Keyword checklist used when the standard analysis times out.

const CATEGORIES: [(&str, &[&str]); 4] = [
    (
        "Основная надпись",
        &["разраб", "пров", "лист", "листов", "масса", "масштаб"],
    ),
    ("Код документа", &["сб", "во", "гч", "мч", "рнат"]),
    ("Подписи", &["разраб", "пров", "т.контр", "утв"]),
    ("Графика", &["ra", "поверхность", "размер", "стрелка"]),
];

const HEADER: &str = "УПРОЩЕННЫЙ АНАЛИЗ (после таймаута):\n\n";
const NOTE: &str =
    "\nПримечание: Полный анализ не удался из-за таймаута нейросети. Графика не проанализирована.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCheck {
    pub name: &'static str,
    pub found: bool,
}

/// A category is present when any of its keywords occurs as a substring
/// of the lowercased text.
pub fn evaluate(text: &str) -> Vec<CategoryCheck> {
    let lowered = text.to_lowercase();
    CATEGORIES
        .iter()
        .map(|&(name, keywords)| CategoryCheck {
            name,
            found: keywords.iter().any(|keyword| lowered.contains(*keyword)),
        })
        .collect()
}

pub fn heuristic_report(text: &str) -> String {
    let mut report = String::from(HEADER);
    for check in evaluate(text) {
        let mark = if check.found { "✓ ЕСТЬ" } else { "✗ НЕТ" };
        report.push_str(&format!("{}: {}\n", check.name, mark));
    }
    report.push_str(NOTE);
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_keep_their_order() {
        let names: Vec<_> = evaluate("").into_iter().map(|check| check.name).collect();
        assert_eq!(
            names,
            ["Основная надпись", "Код документа", "Подписи", "Графика"]
        );
    }
}
