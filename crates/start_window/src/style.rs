//! Script handle naming and the injected validation style.

/// Default script handle; hook names and the error class derive from it.
pub const DEFAULT_HANDLE: &str = "tribe-ext-custom-datepicker-start-date";

/// The handle with hyphens replaced by underscores.
pub fn handle_underscores(handle: &str) -> String {
    handle.replace('-', "_")
}

/// CSS class applied to a rejected start date input.
pub fn error_css_class(handle: &str) -> String {
    format!("{}_error", handle_underscores(handle))
}

/// `<style>` block making the error class visible, matching the admin's own
/// form error styling.
pub fn validation_style(handle: &str) -> String {
    format!(
        concat!(
            "<style id=\"{id}\">\n",
            "\t.{class} {{\n",
            "\t\tborder-color: #dc3232 !important;\n",
            "\t\tbox-shadow: 0 0 2px rgba(204, 0, 0, 0.8) !important;\n",
            "\t}}\n",
            "</style>\n"
        ),
        id = handle_underscores(handle),
        class = error_css_class(handle),
    )
}
