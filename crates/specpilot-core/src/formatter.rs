//! Markdown rendering of SRS documents.

use specpilot_models::SrsDocument;

/// Renders an SRS document as Markdown.
///
/// Section order is fixed: title, overview, functional requirements,
/// non-functional requirements, tech stack, test scenarios, assumptions.
/// List sections after the functional requirements are omitted when empty.
pub fn to_markdown(doc: &SrsDocument) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", doc.project_name));
    md.push_str(&format!("## 프로젝트 개요\n\n{}\n\n", doc.overview));

    md.push_str("## 기능 요구사항\n\n");
    for fr in &doc.functional_requirements {
        md.push_str(&format!("### {}: {}\n\n", fr.id, fr.title));
        md.push_str(&format!("**우선순위**: {}\n\n", fr.priority));
        md.push_str(&format!("{}\n\n", fr.description));
        if !fr.tech_suggestions.is_empty() {
            md.push_str(&format!("**기술 제안**: {}\n\n", fr.tech_suggestions.join(", ")));
        }
    }

    if !doc.non_functional_requirements.is_empty() {
        md.push_str("## 비기능 요구사항\n\n");
        for nfr in &doc.non_functional_requirements {
            md.push_str(&format!("- {}\n", nfr));
        }
        md.push('\n');
    }

    if !doc.tech_stack.is_empty() {
        md.push_str("## 기술 스택\n\n");
        for tech in &doc.tech_stack {
            md.push_str(&format!("### {}\n\n", tech.category));
            md.push_str(&format!("**기술**: {}\n\n", tech.technologies.join(", ")));
            md.push_str(&format!("**선정 이유**: {}\n\n", tech.rationale));
        }
    }

    if !doc.test_scenarios.is_empty() {
        md.push_str("## 테스트 시나리오\n\n");
        for scenario in &doc.test_scenarios {
            md.push_str(&format!("### {}: {}\n\n", scenario.feature, scenario.scenario));
            md.push_str(&format!("- **Given** {}\n", scenario.given));
            md.push_str(&format!("- **When** {}\n", scenario.when));
            md.push_str(&format!("- **Then** {}\n\n", scenario.then));
        }
    }

    if !doc.assumptions.is_empty() {
        md.push_str("## 가정사항\n\n");
        for assumption in &doc.assumptions {
            md.push_str(&format!("- {}\n", assumption));
        }
        md.push('\n');
    }

    md.trim_end().to_string() + "\n"
}
