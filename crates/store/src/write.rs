//! INI rendering.

use std::io;

use crate::document::IniStore;

impl IniStore {
    /// Render the document as INI text: defaults first (when any), then
    /// the named sections in insertion order.
    pub fn write_string(&self) -> String {
        let mut out = String::new();
        let mut write_section = |name: &str, entries: Vec<(&str, &str)>| {
            if entries.is_empty() {
                out.push_str(&format!("[{name}]\n\n"));
                return;
            }
            out.push_str(&format!("[{name}]\n"));
            for (key, value) in entries {
                out.push_str(&format!("{key} = {value}\n"));
            }
            out.push('\n');
        };

        if !self.defaults().is_empty() {
            write_section(self.default_section(), self.defaults().iter().collect());
        }
        for name in self.sections() {
            if let Some(section) = self.section(name) {
                write_section(name, section.iter().collect());
            }
        }
        out
    }

    /// Write the rendered document to `writer`.
    pub fn write_to<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.write_string().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_defaults_first_then_sections() {
        let mut store = IniStore::new();
        store.set("DEFAULT", "shared", "x").unwrap();
        store.add_section("b").unwrap();
        store.set("b", "k2", "2").unwrap();
        store.add_section("a").unwrap();
        store.set("a", "k1", "1").unwrap();

        assert_eq!(
            store.write_string(),
            "[DEFAULT]\nshared = x\n\n[b]\nk2 = 2\n\n[a]\nk1 = 1\n\n"
        );
    }

    #[test]
    fn rendered_output_parses_back() {
        let mut store = IniStore::new();
        store.set("DEFAULT", "shared", "x").unwrap();
        store.add_section("s").unwrap();
        store.set("s", "k", "v").unwrap();

        let mut reread = IniStore::new();
        reread.read_string(&store.write_string()).unwrap();
        assert_eq!(reread.get("s", "k"), Some("v"));
        assert_eq!(reread.defaults().get("shared"), Some("x"));
    }

    #[test]
    fn empty_store_renders_empty() {
        assert_eq!(IniStore::new().write_string(), "");
    }
}
