use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::dom::Document;

/// Where a composed print document ends up. The file surface is the
/// open-a-window-and-print analog; tests record instead.
pub trait PrintSurface {
    fn print(&mut self, markup: &str) -> Result<()>;
}

/// Writes the print document next to other output files.
pub struct FilePrintSurface {
    path: PathBuf,
}

impl FilePrintSurface {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PrintSurface for FilePrintSurface {
    fn print(&mut self, markup: &str) -> Result<()> {
        fs::write(&self.path, markup)?;
        Ok(())
    }
}

/// Compose a standalone print document for one element (stylesheet link
/// plus the element's markup) and hand it to the surface. A missing
/// element is a silent no-op; returns whether anything was printed.
pub fn print_element(
    doc: &Document,
    element_id: &str,
    stylesheet_href: &str,
    surface: &mut dyn PrintSurface,
) -> Result<bool> {
    let Some(element) = doc.get_element_by_id(element_id) else {
        return Ok(false);
    };

    let markup = format!(
        "<html><head><title>Print</title>\
         <link rel=\"stylesheet\" href=\"{}\"></head>\
         <body>{}</body></html>",
        stylesheet_href,
        doc.inner_html(element)
    );
    surface.print(&markup)?;
    Ok(true)
}
