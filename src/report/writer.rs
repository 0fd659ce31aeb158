use std::path::Path;

use anyhow::Result;

pub struct Section {
    pub title: String,
    pub content: String,
}

/// Persist the ordered sections as one markdown document.
pub fn write_markdown(path: &Path, title: &str, sections: &[Section]) -> Result<()> {
    let mut out = String::new();
    out.push_str(&format!("# {title}\n"));
    for section in sections {
        out.push_str(&format!("\n## {}\n\n{}\n", section.title, section.content.trim()));
    }
    std::fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_render_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");

        let sections = vec![
            Section { title: "First".into(), content: "alpha".into() },
            Section { title: "Second".into(), content: "beta\n".into() },
        ];
        write_markdown(&path, "Study Report", &sections).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.starts_with("# Study Report\n"));
        let first = body.find("## First").unwrap();
        let second = body.find("## Second").unwrap();
        assert!(first < second);
        assert!(body.contains("alpha"));
        assert!(body.ends_with("beta\n"));
    }
}
