//! Error types for heapfrag.

/// Creates the Error, ErrorKind, ResultExt, and Result types
error_chain! {
    errors {
        MissingParameter(key: String) {
            description("missing benchmark parameter")
            display("result has no parameter '{}'", key)
        }
        EmptyInput(what: String) {
            description("nothing to report")
            display("no usable {} in input", what)
        }
        UnknownRegionType(token: String) {
            description("unknown heap region type")
            display("invalid region type: '{}'", token)
        }
        MalformedLine(line: String) {
            description("malformed log line")
            display("malformed log line: {}", line)
        }
        UnknownScheme(name: String) {
            description("unknown categorization scheme")
            display("unknown scheme '{}' (expected region-size, logging or publication)", name)
        }
        Render(msg: String) {
            description("error in rendering the chart")
            display("failed to render chart: {}", msg)
        }
    }

    foreign_links {
        Io(::std::io::Error);
        Csv(::csv::Error);
        Json(::serde_json::Error);
        Toml(::toml::de::Error);
    }
}

/// Wraps a plotting backend failure.
pub fn render_err<E: ::std::fmt::Display>(e: E) -> Error {
    ErrorKind::Render(e.to_string()).into()
}
