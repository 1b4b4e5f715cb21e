use crate::error::Result;
use satchel_config::{Config, ProviderKind};
use std::fmt::Write;

pub fn run(config: &Config) -> Result<()> {
    print!("{}", render(config));
    Ok(())
}

/// One line per shelf; the one used by default is starred.
fn render(config: &Config) -> String {
    let default = config.shelf(None).ok().map(|(name, _)| name);
    let mut out = String::new();
    for (key, shelf) in &config.shelves {
        let marker = if default == Some(key.as_str()) { '*' } else { ' ' };
        let provider = match shelf.provider {
            ProviderKind::Drive => "drive",
            ProviderKind::Local => "local",
        };
        let _ = writeln!(out, "{marker} {key:<12} {:<16} {provider:<6} {}", shelf.display_name(key), shelf.root);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use satchel_config::ShelfConfig;

    fn shelf(display_name: Option<&str>, provider: ProviderKind, root: &str) -> ShelfConfig {
        ShelfConfig {
            display_name: display_name.map(str::to_string),
            provider,
            root: root.to_string(),
            link: Default::default(),
        }
    }

    #[test]
    fn test_render() {
        let mut config = Config::default();
        config.shelves.insert("pyq".to_string(), shelf(Some("PYQ"), ProviderKind::Local, "/srv/pyq"));
        config.shelves.insert("material".to_string(), shelf(Some("Material"), ProviderKind::Drive, "1Z4t"));
        assert_eq!(
            render(&config),
            "* material     Material         drive  1Z4t\n  pyq          PYQ              local  /srv/pyq\n"
        );

        config.default_shelf = Some("pyq".to_string());
        assert!(render(&config).starts_with("  material"));
        assert!(render(&config).contains("* pyq"));
    }
}
