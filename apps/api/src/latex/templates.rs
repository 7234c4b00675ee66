//! Template registry — the closed set of LaTeX templates a resume can be compiled into.
//!
//! Templates are compiled into the binary. Each one is a complete, self-contained
//! document that uses only standard TeX Live packages and defines `\resumesection`,
//! the heading macro the filler emits for non-empty sections.
//!
//! Placeholders use the `{{{NAME}}}` form; see `latex::filler` for the grammar.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::latex::CompilerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    Modern,
    Classic,
    Minimal,
}

impl TemplateId {
    pub const ALL: [TemplateId; 3] = [TemplateId::Modern, TemplateId::Classic, TemplateId::Minimal];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Modern => "modern",
            TemplateId::Classic => "classic",
            TemplateId::Minimal => "minimal",
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            TemplateId::Modern => MODERN,
            TemplateId::Classic => CLASSIC,
            TemplateId::Minimal => MINIMAL,
        }
    }

    /// Comma-separated list of every registered id, for error messages.
    pub fn valid_ids() -> String {
        Self::ALL
            .iter()
            .map(TemplateId::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = CompilerError;

    /// Ids are matched exactly (lowercase, no surrounding whitespace).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| CompilerError::UnknownTemplate(s.to_string()))
    }
}

/// Resolves a template id to its registry entry.
pub fn lookup_template(id: &str) -> Result<TemplateId, CompilerError> {
    id.parse()
}

// ────────────────────────────────────────────────────────────────────────────
// Template sources
// ────────────────────────────────────────────────────────────────────────────

const MODERN: &str = r"\documentclass[11pt,letterpaper]{article}
\usepackage[T1]{fontenc}
\usepackage[utf8]{inputenc}
\usepackage{lmodern}
\usepackage[margin=0.75in]{geometry}
\usepackage{xcolor}
\usepackage{titlesec}
\usepackage{enumitem}
\usepackage[hidelinks]{hyperref}

\definecolor{accent}{RGB}{31,78,121}
\titleformat{\section}{\large\bfseries\color{accent}}{}{0em}{}[\titlerule]
\titlespacing*{\section}{0pt}{10pt}{6pt}
\setlist[itemize]{leftmargin=1.5em,noitemsep,topsep=2pt}
\setlength{\parindent}{0pt}
\pagestyle{empty}

\newcommand{\resumesection}[1]{\section*{#1}}

\begin{document}

\begin{center}
  {\LARGE\bfseries {{{FULL_NAME}}}}\par
  \smallskip
  {{{CONTACT}}}
\end{center}

{{{SUMMARY_SECTION}}}
{{{EXPERIENCE_SECTION}}}
{{{PROJECTS_SECTION}}}
{{{EDUCATION_SECTION}}}
{{{SKILLS_SECTION}}}
{{{CERTIFICATIONS_SECTION}}}

\end{document}
";

const CLASSIC: &str = r"\documentclass[11pt,a4paper]{article}
\usepackage[T1]{fontenc}
\usepackage[utf8]{inputenc}
\usepackage{charter}
\usepackage[margin=2cm]{geometry}
\usepackage{enumitem}
\usepackage[hidelinks]{hyperref}

\setlist[itemize]{leftmargin=1.5em,itemsep=1pt,topsep=3pt}
\setlength{\parindent}{0pt}
\pagestyle{empty}

\newcommand{\resumesection}[1]{%
  \par\medskip
  {\large\scshape #1}\par
  \vspace{-2pt}\rule{\textwidth}{0.4pt}\par
  \smallskip}

\begin{document}

\begin{center}
  {\Huge\scshape {{{FULL_NAME}}}}\par
  \medskip
  {{{CONTACT}}}
\end{center}

{{{SUMMARY_SECTION}}}
{{{EDUCATION_SECTION}}}
{{{EXPERIENCE_SECTION}}}
{{{PROJECTS_SECTION}}}
{{{CERTIFICATIONS_SECTION}}}
{{{SKILLS_SECTION}}}

\end{document}
";

const MINIMAL: &str = r"\documentclass[10pt,letterpaper]{article}
\usepackage[T1]{fontenc}
\usepackage[utf8]{inputenc}
\usepackage[margin=1in]{geometry}
\usepackage{enumitem}
\usepackage[hidelinks]{hyperref}

\setlist[itemize]{leftmargin=1.2em,nosep}
\setlength{\parindent}{0pt}
\pagestyle{empty}

\newcommand{\resumesection}[1]{\par\bigskip\textbf{\MakeUppercase{#1}}\par\smallskip}

\begin{document}

{\Large {{{FULL_NAME}}}}\par
{{{CONTACT}}}\par

{{{SUMMARY_SECTION}}}
{{{EXPERIENCE_SECTION}}}
{{{EDUCATION_SECTION}}}
{{{PROJECTS_SECTION}}}
{{{SKILLS_SECTION}}}
{{{CERTIFICATIONS_SECTION}}}

\end{document}
";
