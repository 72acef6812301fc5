//! Risk reduction methods - the hierarchy of controls
//!
//! Groups are listed from most to least effective. Sub-methods carry a
//! dotted code ("3.2") so they can be referenced from the command line.

use miette::Diagnostic;
use thiserror::Error;

/// One level of the hierarchy of controls
#[derive(Debug, Clone, Copy)]
pub struct MethodGroup {
    pub code: &'static str,
    pub name: &'static str,
    pub methods: &'static [(&'static str, &'static str)],
}

impl MethodGroup {
    /// Label as shown to users, e.g. "3 Guard against hazard"
    pub fn label(&self) -> String {
        format!("{} {}", self.code, self.name)
    }
}

pub const HIERARCHY: &[MethodGroup] = &[
    MethodGroup {
        code: "1",
        name: "Eliminate by design",
        methods: &[
            ("1.1", "Prevent energy buildup"),
            ("1.2", "Prevent energy release"),
            ("1.3", "Separate hazard/people in time or space"),
            ("1.4", "Wire to electrical codes (NEC/IEC)"),
            ("1.5", "Other design change"),
        ],
    },
    MethodGroup {
        code: "2",
        name: "Substitution",
        methods: &[
            ("2.1", "Replace with less hazardous material"),
            ("2.2", "Replace with less hazardous process"),
            ("2.3", "Replace with less hazardous equipment"),
        ],
    },
    MethodGroup {
        code: "3",
        name: "Guard against hazard",
        methods: &[
            ("3.1", "Fixed guards"),
            ("3.2", "Interlocked guards"),
            ("3.3", "Adjustable guards"),
            ("3.4", "Self-adjusting guards"),
            ("3.5", "Safety devices (light curtains, pressure mats)"),
        ],
    },
    MethodGroup {
        code: "4",
        name: "Warn of hazard",
        methods: &[
            ("4.1", "Warning signs and labels"),
            ("4.2", "Warning lights and alarms"),
            ("4.3", "Safety instructions and procedures"),
        ],
    },
    MethodGroup {
        code: "5",
        name: "Train user",
        methods: &[
            ("5.1", "Safety training programs"),
            ("5.2", "Standard operating procedures"),
            ("5.3", "Emergency response training"),
            ("5.4", "Competency assessment"),
        ],
    },
    MethodGroup {
        code: "6",
        name: "Personal Protective Equipment (PPE)",
        methods: &[
            ("6.1", "Head protection (hard hats)"),
            ("6.2", "Eye and face protection"),
            ("6.3", "Hearing protection"),
            ("6.4", "Respiratory protection"),
            ("6.5", "Hand protection (gloves)"),
            ("6.6", "Body protection (safety vests, coveralls)"),
            ("6.7", "Foot protection (safety shoes)"),
            ("6.8", "Fall protection equipment"),
        ],
    },
];

#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum MethodError {
    #[error("Unknown risk reduction method: {0}")]
    #[diagnostic(code(mrt::methods::unknown), help("see `mrt catalog methods` for valid codes"))]
    Unknown(String),
}

/// Resolve a group ("3") or method ("3.2") code to its display label
pub fn lookup(code: &str) -> Result<String, MethodError> {
    let code = code.trim();
    for group in HIERARCHY {
        if group.code == code {
            return Ok(group.label());
        }
        if let Some((c, name)) = group.methods.iter().find(|(c, _)| *c == code) {
            return Ok(format!("{} {}", c, name));
        }
    }
    Err(MethodError::Unknown(code.to_string()))
}

/// Comma-joined labels for a set of codes, in the order given
pub fn join_methods<S: AsRef<str>>(codes: &[S]) -> Result<String, MethodError> {
    let labels = codes
        .iter()
        .map(|c| lookup(c.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(labels.join(", "))
}
