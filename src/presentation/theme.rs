use colored::Colorize;

pub struct Theme {
    pub title: fn(&str) -> String,
    pub line: fn(&str) -> String,
    pub idx: fn(&str) -> String,
    pub name: fn(&str) -> String,
    pub label: fn(&str) -> String,
    pub value: fn(&str) -> String,
    pub muted: fn(&str) -> String,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "temp" | "" => Self::temp(),
            "canvas" => Self::canvas(),
            "plain" => Self::plain(),
            _ => {
                eprintln!("{}", format!("✘ Unknown theme: {}", name).red());
                Self::temp() // Fallback to default
            }
        }
    }

    fn temp() -> Self {
        Self {
            title: |s| s.bright_magenta().italic().bold().underline().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            idx: |s| s.bright_white().to_string(),
            name: |s| s.white().to_string(),
            label: |s| s.cyan().to_string(),
            value: |s| s.yellow().to_string(),
            muted: |s| s.bright_white().dimmed().italic().to_string(),
        }
    }

    fn canvas() -> Self {
        Self {
            title: |s| s.blue().bold().underline().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            idx: |s| s.cyan().to_string(),
            name: |s| s.black().to_string(),
            label: |s| s.bright_cyan().bold().to_string(),
            value: |s| s.black().to_string(),
            muted: |s| s.bright_black().italic().to_string(),
        }
    }

    fn plain() -> Self {
        Self {
            title: |s| s.to_string(),
            line: |s| s.to_string(),
            idx: |s| s.to_string(),
            name: |s| s.to_string(),
            label: |s| s.to_string(),
            value: |s| s.to_string(),
            muted: |s| s.to_string(),
        }
    }
}
