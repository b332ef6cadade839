use std::io::Write;
use tracing::error;

use crate::status::page::PageElements;
use crate::status::response::JobState;

/// Output format for status updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn renderer(self) -> Box<dyn Renderer> {
        match self {
            OutputFormat::Text => Box::new(TerminalRenderer::new(std::io::stdout())),
            OutputFormat::Json => Box::new(JsonRenderer::new(std::io::stdout())),
        }
    }
}

/// Shows the page elements after each poll
pub trait Renderer: Send {
    fn render(&mut self, page: &PageElements, state: JobState);
}

impl Renderer for Box<dyn Renderer> {
    fn render(&mut self, page: &PageElements, state: JobState) {
        (**self).render(page, state)
    }
}

/// Prints the elements whose content changed since the previous render
pub struct TerminalRenderer<W> {
    out: W,
    last: Option<PageElements>,
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_page(&mut self, page: &PageElements, state: JobState) -> std::io::Result<()> {
        let previous = self.last.as_ref();
        let changed = |pick: fn(&PageElements) -> &String| {
            let text = pick(page);
            !text.is_empty() && previous.map_or(true, |p| pick(p) != text)
        };

        if changed(|p| &p.status) {
            writeln!(self.out, "{}", page.status)?;
        }
        if changed(|p| &p.crawl_url) {
            writeln!(self.out, "{}", page.crawl_url)?;
        }
        if changed(|p| &p.number_of_crawled_urls) {
            writeln!(self.out, "{}", page.number_of_crawled_urls)?;
        }
        if changed(|p| &p.timing) {
            writeln!(self.out, "{}", page.timing)?;
        }
        if state.is_terminal() && !page.report_link.is_empty() {
            writeln!(self.out, "Report: {}", page.report_link)?;
        }
        self.out.flush()
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn render(&mut self, page: &PageElements, state: JobState) {
        if let Err(e) = self.write_page(page, state) {
            error!("Failed to write status update: {}", e);
        }
        self.last = Some(page.clone());
    }
}

/// Prints every update as one JSON object per line
pub struct JsonRenderer<W> {
    out: W,
}

impl<W: Write + Send> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Renderer for JsonRenderer<W> {
    fn render(&mut self, page: &PageElements, state: JobState) {
        let line = serde_json::json!({
            "state": state,
            "elements": page,
        });

        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            error!("Failed to write status update: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(status: &str, count: &str, report_link: &str) -> PageElements {
        PageElements {
            status: format!("Job is {}", status),
            crawl_url: "Crawling url http://x".to_string(),
            number_of_crawled_urls: count.to_string(),
            report_link: report_link.to_string(),
            timing: String::new(),
        }
    }

    #[test]
    fn test_terminal_prints_only_changes() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render(&page("Running", "5 urls crawled.", ""), JobState::Polling);
        renderer.render(&page("Running", "8 urls crawled.", ""), JobState::Polling);
        renderer.render(
            &page("Finished OK", "8 urls crawled.", "<a href=\"r\">r</a>"),
            JobState::Finished,
        );

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(
            output,
            "Job is Running\n\
             Crawling url http://x\n\
             5 urls crawled.\n\
             8 urls crawled.\n\
             Job is Finished OK\n\
             Report: <a href=\"r\">r</a>\n"
        );
    }

    #[test]
    fn test_json_lines() {
        let mut renderer = JsonRenderer::new(Vec::new());
        renderer.render(&page("Running", "", ""), JobState::Polling);

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(output.trim()).unwrap();

        assert_eq!(value["state"], "polling");
        assert_eq!(value["elements"]["status"], "Job is Running");
        assert_eq!(value["elements"]["report_link"], "");
    }
}
