//! Section block builders — turn repeating resume entries into LaTeX fragments.
//!
//! # Builder contract
//! - Every free-text sub-field is escaped exactly once (`escape_line` / `escape_latex`).
//! - Entries render in input order. Nothing is sorted, deduplicated or dropped on purpose;
//!   an entry with no text at all simply contributes nothing visible.
//! - Absent optional sub-fields (gpa, link, credentialId) are omitted, never placeholdered.
//! - An empty input yields `""`. Whether an empty section gets a heading is decided by the filler.
//!
//! Fragments use only article-class commands plus `\href` (hyperref) and `itemize`,
//! so they embed in any registered template.

use crate::latex::escape::{escape_latex, escape_line};
use crate::models::resume::{
    present, CertificationEntry, EducationEntry, ExperienceEntry, ProjectEntry,
};

const ENTRY_SEPARATOR: &str = "\\medskip\n";
// `\item` looks ahead for `[` and `\\` for `[` or `*`; the empty group ends the lookahead
// so user text starting with `[` or `*` stays text.
const LINE_BREAK: &str = " \\\\{}\n";
const ITEM: &str = "  \\item{} ";
const BAR_SEPARATOR: &str = " \\textbar{} ";

// ────────────────────────────────────────────────────────────────────────────
// Section builders
// ────────────────────────────────────────────────────────────────────────────

/// Institution and dates on the first line; degree/field and GPA on the second.
pub fn build_education_block(entries: &[EducationEntry]) -> String {
    join_entries(entries.iter().map(|entry| {
        let header = header_line(
            &bold(&escape_line(&entry.institution)),
            &date_range(&entry.start_date, &entry.end_date),
        );

        let study = join_non_empty(
            &[escape_line(&entry.degree), escape_line(&entry.field)],
            " in ",
        );
        let gpa = present(&entry.gpa)
            .map(|g| format!("GPA: {}", escape_line(g)))
            .unwrap_or_default();
        let detail = header_line(&italic(&study), &gpa);

        paragraph(&[header, detail], "")
    }))
}

/// Position and dates, then company, then the bullet list.
///
/// When the position is blank the company takes the bold header slot.
pub fn build_experience_block(entries: &[ExperienceEntry]) -> String {
    join_entries(entries.iter().map(|entry| {
        let position = escape_line(&entry.position);
        let company = escape_line(&entry.company);
        let dates = date_range(&entry.start_date, &entry.end_date);

        let lines = if position.is_empty() {
            vec![header_line(&bold(&company), &dates)]
        } else {
            vec![header_line(&bold(&position), &dates), italic(&company)]
        };

        paragraph(&lines, &itemize(&entry.bullets))
    }))
}

/// Name, technologies and link on the first line; description; bullet list.
pub fn build_projects_block(entries: &[ProjectEntry]) -> String {
    join_entries(entries.iter().map(|entry| {
        let mut title = bold(&escape_line(&entry.name));
        let technologies = escape_line(&entry.technologies);
        if !technologies.is_empty() {
            if !title.is_empty() {
                title.push_str(BAR_SEPARATOR);
            }
            title.push_str(&format!("\\emph{{{technologies}}}"));
        }

        let link = present(&entry.link).map(hyperlink).unwrap_or_default();
        let header = header_line(&title, &link);
        let description = escape_line(&entry.description);

        paragraph(&[header, description], &itemize(&entry.bullets))
    }))
}

/// Name, issuer and date on one line; credential id below when present.
pub fn build_certifications_block(entries: &[CertificationEntry]) -> String {
    join_entries(entries.iter().map(|entry| {
        let title = join_non_empty(
            &[bold(&escape_line(&entry.name)), escape_line(&entry.issuer)],
            " -- ",
        );
        let header = header_line(&title, &escape_line(&entry.date));
        let credential = present(&entry.credential_id)
            .map(|id| format!("Credential ID: {}", escape_line(id)))
            .unwrap_or_default();

        paragraph(&[header, credential], "")
    }))
}

/// Escaped skills joined with `", "`. Blank skills are skipped.
pub fn build_skills_block(skills: &[String]) -> String {
    skills
        .iter()
        .map(|s| escape_line(s))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Contact details for the resume header: email, phone and profile links
/// separated by a vertical bar. Blank fields are skipped.
pub fn build_contact_line(email: &str, phone: &str, links: &[&str]) -> String {
    let mut parts = Vec::new();

    let email = email.trim();
    if !email.is_empty() {
        parts.push(format!(
            "\\href{{mailto:{}}}{{{}}}",
            href_target(email),
            escape_line(email)
        ));
    }

    let phone = escape_line(phone);
    if !phone.is_empty() {
        parts.push(phone);
    }

    parts.extend(
        links
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| hyperlink(l)),
    );

    parts.join(BAR_SEPARATOR)
}

// ────────────────────────────────────────────────────────────────────────────
// Fragment helpers
// ────────────────────────────────────────────────────────────────────────────

fn join_entries(entries: impl Iterator<Item = String>) -> String {
    entries
        .filter(|e| !e.is_empty())
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}

/// Renders non-empty `lines` as one paragraph, followed by `trailer` (a list) if any.
/// Returns `""` when there is nothing to render, so the entry degrades to nothing
/// instead of an empty `\\` line break, which LaTeX rejects.
fn paragraph(lines: &[String], trailer: &str) -> String {
    let lines: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|l| !l.is_empty())
        .collect();

    let mut out = String::new();
    if !lines.is_empty() {
        out.push_str("\\noindent ");
        out.push_str(&lines.join(LINE_BREAK));
        out.push_str("\\par\n");
    }
    out.push_str(trailer);
    out
}

/// `left \hfill right`, degrading to whichever side is non-empty.
fn header_line(left: &str, right: &str) -> String {
    match (left.is_empty(), right.is_empty()) {
        (false, false) => format!("{left} \\hfill {right}"),
        (false, true) => left.to_string(),
        (true, false) => format!("\\hfill {right}"),
        (true, true) => String::new(),
    }
}

/// An itemize list of escaped, single-line bullets. Blank bullets are skipped and
/// no environment is emitted when none remain (an empty itemize is a LaTeX error).
fn itemize(bullets: &[String]) -> String {
    let items: Vec<String> = bullets
        .iter()
        .map(|b| escape_line(b))
        .filter(|b| !b.is_empty())
        .collect();

    if items.is_empty() {
        return String::new();
    }

    let mut out = String::from("\\begin{itemize}\n");
    for item in items {
        out.push_str(ITEM);
        out.push_str(&item);
        out.push('\n');
    }
    out.push_str("\\end{itemize}\n");
    out
}

fn date_range(start: &str, end: &str) -> String {
    join_non_empty(&[escape_line(start), escape_line(end)], " -- ")
}

fn join_non_empty(parts: &[String], sep: &str) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(sep)
}

fn bold(escaped: &str) -> String {
    wrap("textbf", escaped)
}

fn italic(escaped: &str) -> String {
    wrap("textit", escaped)
}

fn wrap(command: &str, escaped: &str) -> String {
    if escaped.is_empty() {
        String::new()
    } else {
        format!("\\{command}{{{escaped}}}")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Hyperlinks
// ────────────────────────────────────────────────────────────────────────────

/// Renders a user-supplied URL as `\href{target}{display}`.
///
/// Scheme-less links get `https://`. Links with any scheme other than http, https
/// or mailto are rendered as plain escaped text with no hyperlink.
fn hyperlink(raw: &str) -> String {
    let url: String = raw.split_whitespace().collect();
    let display = escape_latex(display_url(&url));

    let lower = url.to_ascii_lowercase();
    let target = if lower.starts_with("https://")
        || lower.starts_with("http://")
        || lower.starts_with("mailto:")
    {
        url.clone()
    } else if has_scheme(&url) {
        return display;
    } else {
        format!("https://{url}")
    };

    format!("\\href{{{}}}{{{}}}", href_target(&target), display)
}

fn display_url(url: &str) -> &str {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    stripped.strip_suffix('/').unwrap_or(stripped)
}

/// True for `scheme:` prefixes (RFC 3986) that are not a `host:port` pair.
fn has_scheme(url: &str) -> bool {
    match url.split_once(':') {
        Some((scheme, rest)) => {
            let valid_scheme = scheme
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
            let is_port = rest.chars().next().is_some_and(|c| c.is_ascii_digit());
            valid_scheme && !is_port
        }
        None => false,
    }
}

/// Escapes a URL for the first argument of `\href`.
///
/// `%` and `#` use hyperref's `\%` / `\#` forms. Characters that could unbalance
/// groups or start a command are percent-encoded (with the `%` itself escaped).
/// Whitespace is removed.
fn href_target(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            c if c.is_ascii_alphanumeric() => out.push(c),
            '-' | '.' | ':' | '/' | '?' | '=' | '@' | '+' | ',' | ';' | '!' | '*' | '\'' | '('
            | ')' | '&' => out.push(c),
            '%' => out.push_str(r"\%"),
            '#' => out.push_str(r"\#"),
            c if c.is_whitespace() => {}
            c => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("\\%{byte:02X}"));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latex::escape::tests::is_fully_escaped;

    fn education(gpa: Option<&str>) -> EducationEntry {
        EducationEntry {
            institution: "MIT".to_string(),
            degree: "BS".to_string(),
            field: "CS".to_string(),
            start_date: "2018".to_string(),
            end_date: "2022".to_string(),
            gpa: gpa.map(str::to_string),
        }
    }

    fn experience(company: &str, bullets: &[&str]) -> ExperienceEntry {
        ExperienceEntry {
            company: company.to_string(),
            position: "Dev".to_string(),
            start_date: "2022".to_string(),
            end_date: "Now".to_string(),
            bullets: bullets.iter().map(|b| b.to_string()).collect(),
        }
    }

    fn project(link: Option<&str>) -> ProjectEntry {
        ProjectEntry {
            name: "Resume Compiler".to_string(),
            description: "Turns JSON into LaTeX".to_string(),
            technologies: "Rust, axum".to_string(),
            link: link.map(str::to_string),
            bullets: vec!["Single-pass filler".to_string()],
        }
    }

    fn certification(credential_id: Option<&str>) -> CertificationEntry {
        CertificationEntry {
            name: "AWS Certified".to_string(),
            issuer: "Amazon".to_string(),
            date: "2023".to_string(),
            credential_id: credential_id.map(str::to_string),
        }
    }

    // ── skills ──────────────────────────────────────────────────────────────

    #[test]
    fn test_skills_empty() {
        assert_eq!(build_skills_block(&[]), "");
    }

    #[test]
    fn test_skills_joined_with_comma() {
        assert_eq!(
            build_skills_block(&["a".to_string(), "b".to_string()]),
            "a, b"
        );
    }

    #[test]
    fn test_skills_escaped_and_blank_skipped() {
        let skills = vec!["C#".to_string(), "  ".to_string(), "R&D\nops".to_string()];
        assert_eq!(build_skills_block(&skills), r"C\#, R\&D ops");
    }

    // ── education ───────────────────────────────────────────────────────────

    #[test]
    fn test_education_contains_fields() {
        let block = build_education_block(&[education(Some("3.9"))]);
        assert!(block.contains("MIT"));
        assert!(block.contains("BS"));
        assert!(block.contains("2018"));
        assert!(block.contains("GPA: 3.9"));
    }

    #[test]
    fn test_education_empty() {
        assert_eq!(build_education_block(&[]), "");
    }

    #[test]
    fn test_education_gpa_absent_omitted() {
        assert!(!build_education_block(&[education(None)]).contains("GPA"));
        assert!(!build_education_block(&[education(Some(" "))]).contains("GPA"));
    }

    #[test]
    fn test_education_zero_gpa_kept() {
        assert!(build_education_block(&[education(Some("0.0"))]).contains("GPA: 0.0"));
    }

    #[test]
    fn test_education_missing_dates_no_dangling_separator() {
        let entry = EducationEntry {
            institution: "MIT".to_string(),
            start_date: "2018".to_string(),
            ..Default::default()
        };
        let block = build_education_block(&[entry]);
        assert!(block.contains("2018"));
        assert!(!block.contains("--"));
        assert!(!block.contains(r"\textit"));
    }

    #[test]
    fn test_education_all_blank_entry_renders_nothing() {
        assert_eq!(build_education_block(&[EducationEntry::default()]), "");
    }

    #[test]
    fn test_education_preserves_order() {
        let mut second = education(None);
        second.institution = "Stanford".to_string();
        let block = build_education_block(&[education(None), second]);
        let mit = block.find("MIT").unwrap();
        let stanford = block.find("Stanford").unwrap();
        assert!(mit < stanford);
        assert_eq!(block.matches(ENTRY_SEPARATOR).count(), 1);
    }

    // ── experience ──────────────────────────────────────────────────────────

    #[test]
    fn test_experience_contains_company_and_bullets() {
        let block = build_experience_block(&[experience("Acme", &["Did X", "Did Y"])]);
        assert!(block.contains("Acme"));
        assert!(block.contains("Did X"));
        assert!(block.contains("\\begin{itemize}"));
        assert!(block.find("Did X").unwrap() < block.find("Did Y").unwrap());
    }

    #[test]
    fn test_experience_bullets_single_line_and_escaped() {
        let block = build_experience_block(&[experience("Acme", &["Grew revenue\n 30%"])]);
        assert!(block.contains(r"\item{} Grew revenue 30\%"));
    }

    #[test]
    fn test_experience_no_bullets_no_itemize() {
        let block = build_experience_block(&[experience("Acme", &["", "  "])]);
        assert!(block.contains("Acme"));
        assert!(!block.contains("itemize"));
    }

    #[test]
    fn test_experience_duplicates_kept() {
        let entry = experience("Acme", &["Did X"]);
        let block = build_experience_block(&[entry.clone(), entry]);
        assert_eq!(block.matches("Acme").count(), 2);
    }

    #[test]
    fn test_experience_blank_position_uses_company_header() {
        let mut entry = experience("Acme", &[]);
        entry.position.clear();
        let block = build_experience_block(&[entry]);
        assert!(block.contains(r"\textbf{Acme}"));
        assert!(!block.contains(r"\textit"));
    }

    #[test]
    fn test_experience_hostile_text_fully_escaped() {
        let mut entry = experience(r"\def\x{y} {{{EMAIL}}}", &[r"50% \& $5 ^_^ ~#"]);
        entry.position = "}}}".to_string();
        let block = build_experience_block(&[entry]);
        assert!(!block.contains("{{{"));
        assert!(block.contains(r"\textbackslash{}def"));
        assert!(block.contains(r"\item{} 50\% \textbackslash{}\& \$5"));
    }

    #[test]
    fn test_bullet_leading_bracket_not_item_label() {
        let block = build_experience_block(&[experience("Acme", &["[Lead] Built X", "*Shipped"])]);
        assert!(block.contains(r"\item{} [Lead] Built X"));
        assert!(block.contains(r"\item{} *Shipped"));
        assert!(!block.contains(r"\item ["));
    }

    #[test]
    fn test_line_breaks_never_take_user_text_as_argument() {
        let mut proj = project(None);
        proj.description = "[2pt] note".to_string();
        let mut edu = education(None);
        edu.degree = "*Honours".to_string();
        let mut job = experience("[Stealth] Co", &[]);
        job.position = "Dev".to_string();
        let mut cert = certification(Some("[x]"));
        cert.date.clear();

        let blocks = [
            build_projects_block(&[proj]),
            build_education_block(&[edu]),
            build_experience_block(&[job]),
            build_certifications_block(&[cert]),
        ];
        for block in blocks {
            assert!(block.contains(LINE_BREAK), "no line break in {block}");
            assert!(!block.contains("\\\\\n"), "bare line break in {block}");
        }
        assert!(build_projects_block(&[project(None)]).contains("\\\\{}\nTurns JSON into LaTeX"));
    }

    // ── projects ────────────────────────────────────────────────────────────

    #[test]
    fn test_projects_renders_link_as_href() {
        let block = build_projects_block(&[project(Some("https://github.com/jane/rc"))]);
        assert!(block.contains(r"\href{https://github.com/jane/rc}{github.com/jane/rc}"));
        assert!(block.contains("Resume Compiler"));
        assert!(block.contains(r"\emph{Rust, axum}"));
        assert!(block.contains(r"\item{} Single-pass filler"));
    }

    #[test]
    fn test_projects_link_absent_omitted() {
        assert!(!build_projects_block(&[project(None)]).contains("\\href"));
        assert!(!build_projects_block(&[project(Some(""))]).contains("\\href"));
    }

    #[test]
    fn test_projects_link_without_scheme_gets_https() {
        let block = build_projects_block(&[project(Some("jane.dev/work"))]);
        assert!(block.contains(r"\href{https://jane.dev/work}{jane.dev/work}"));
    }

    #[test]
    fn test_projects_link_with_port_is_not_a_scheme() {
        let block = build_projects_block(&[project(Some("localhost:8080/demo"))]);
        assert!(block.contains(r"\href{https://localhost:8080/demo}"));
    }

    #[test]
    fn test_projects_link_foreign_scheme_not_linked() {
        let block = build_projects_block(&[project(Some("javascript:alert(1)"))]);
        assert!(!block.contains("\\href"));
        assert!(block.contains("javascript:alert(1)"));
    }

    #[test]
    fn test_projects_link_special_characters_escaped() {
        let block = build_projects_block(&[project(Some("https://x.io/a_b?q=1%20#top}{\\x"))]);
        assert!(block.contains(r"\href{https://x.io/a\%5Fb?q=1\%20\#top\%7D\%7B\%5Cx}"));
        assert!(block.contains(r"{x.io/a\_b?q=1\%20\#top\}\{\textbackslash{}x}"));
    }

    // ── certifications ──────────────────────────────────────────────────────

    #[test]
    fn test_certifications_render_fields() {
        let block = build_certifications_block(&[certification(Some("ABC-123"))]);
        assert!(block.contains(r"\textbf{AWS Certified} -- Amazon \hfill 2023"));
        assert!(block.contains("Credential ID: ABC-123"));
    }

    #[test]
    fn test_certifications_credential_absent_omitted() {
        let block = build_certifications_block(&[certification(None)]);
        assert!(block.contains("AWS Certified"));
        assert!(!block.contains("Credential ID"));
    }

    #[test]
    fn test_certifications_missing_issuer_degrades() {
        let entry = CertificationEntry {
            name: "CKA".to_string(),
            ..Default::default()
        };
        let block = build_certifications_block(&[entry]);
        assert_eq!(block, "\\noindent \\textbf{CKA}\\par\n");
    }

    // ── contact line ────────────────────────────────────────────────────────

    #[test]
    fn test_contact_line_full() {
        let line = build_contact_line(
            "jane_doe@example.com",
            "+1 555 0100",
            &["https://linkedin.com/in/jane", "", "github.com/jane"],
        );
        assert!(line.contains(r"\href{mailto:jane\%5Fdoe@example.com}{jane\_doe@example.com}"));
        assert!(line.contains("+1 555 0100"));
        assert!(line.contains(r"\href{https://linkedin.com/in/jane}{linkedin.com/in/jane}"));
        assert!(line.contains(r"\href{https://github.com/jane}{github.com/jane}"));
        assert_eq!(line.matches(BAR_SEPARATOR).count(), 3);
    }

    #[test]
    fn test_contact_line_empty() {
        assert_eq!(build_contact_line("", " ", &["", " "]), "");
    }

    // ── cross-builder properties ────────────────────────────────────────────

    #[test]
    fn test_user_text_in_fragments_fully_escaped() {
        let hostile = r"\ $ % & _ # { } ~ ^";
        let escaped = escape_line(hostile);
        assert!(is_fully_escaped(&escaped));

        let entry = EducationEntry {
            institution: hostile.to_string(),
            ..Default::default()
        };
        assert!(build_education_block(&[entry]).contains(&escaped));
    }

    #[test]
    fn test_fragments_never_contain_triple_brace() {
        let blocks = [
            build_education_block(&[education(Some("3.9"))]),
            build_experience_block(&[experience("{{{X}}}", &["{{{Y}}}"])]),
            build_projects_block(&[project(Some("https://a.io/{{{Z}}}"))]),
            build_certifications_block(&[certification(Some("{{{ID}}}"))]),
        ];
        for block in blocks {
            assert!(!block.contains("{{{"), "triple brace in {block}");
        }
    }
}
