// Sun Oct 18 2026 - Alex

use colored::*;

const SFINDER_ART: &str = r#"
   _____ ______ _____ _   __ ____   ______ ____
  / ___// ____//  _// | / // __ \ / ____// __ \
  \__ \/ /_    / / /  |/ // / / // __/  / /_/ /
 ___/ / __/  _/ / / /|  // /_/ // /___ / _, _/
/____/_/    /___//_/ |_//_____//_____//_/ |_|
"#;

pub struct Banner {
    subtitle: Option<String>,
    use_color: bool,
}

impl Banner {
    pub fn new() -> Self {
        Self {
            subtitle: None,
            use_color: true,
        }
    }

    pub fn sfinder() -> Self {
        Self::new().with_subtitle("by Gilson Oliveira")
    }

    pub fn with_subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = Some(subtitle.to_string());
        self
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn print(&self) {
        println!("{}", self.render());
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::new();

        for line in SFINDER_ART.lines().skip(1) {
            if self.use_color {
                lines.push(line.cyan().to_string());
            } else {
                lines.push(line.to_string());
            }
        }

        if let Some(subtitle) = &self.subtitle {
            if self.use_color {
                lines.push(subtitle.yellow().to_string());
            } else {
                lines.push(subtitle.clone());
            }
        }

        lines.join("\n")
    }
}

impl Default for Banner {
    fn default() -> Self {
        Self::new()
    }
}
