use crate::{
    cli::Args,
    config::EngineOptions,
    error::{marker_line, Result},
    renderer::{new_renderer, TemplateRenderer},
    resolve::resolve_template_path,
    vars::load_bindings,
};
use log::{debug, info};
use std::io::Write;

/// Runs the render pipeline: bindings, template resolution, rendering.
pub fn render(args: &Args) -> Result<String> {
    let options = EngineOptions::for_include_dir(&args.include_dir);
    debug!("Engine options: {options:?}");
    let renderer = new_renderer(options);

    let bindings = load_bindings(&args.vars_file)?;
    let template = resolve_template_path(&args.include_dir, &args.template_path);
    renderer.render_file(&template, &bindings)
}

/// Produces the stdout payload: the rendered text, or the marker line when
/// anything in the pipeline failed.
pub fn run(args: &Args) -> String {
    match render(args) {
        Ok(rendered) => {
            info!("Rendered {} ({} bytes)", args.template_path, rendered.len());
            rendered
        }
        Err(err) => {
            debug!("Rendering {} failed: {err:?}", args.template_path);
            marker_line(&err)
        }
    }
}

/// Writes the payload followed by a newline unless it already ends with one.
pub fn write_payload<W: Write>(mut out: W, payload: &str) -> std::io::Result<()> {
    out.write_all(payload.as_bytes())?;
    if !payload.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn args(include_dir: &str, template_path: &str, vars_file: PathBuf) -> Args {
        Args { include_dir: include_dir.to_string(), template_path: template_path.to_string(), vars_file }
    }

    #[test]
    fn renders_relative_template() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("greet.slim"), "| Hello #{name}").unwrap();
        let vars = dir.path().join("vars.json");
        fs::write(&vars, r#"{"name": "World"}"#).unwrap();

        let payload = run(&args(dir.path().to_str().unwrap(), "greet.slim", vars));
        assert_eq!(payload, "Hello World");
    }

    #[test]
    fn malformed_json_yields_marker() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("greet.slim"), "| Hello").unwrap();
        let vars = dir.path().join("vars.json");
        fs::write(&vars, "{oops").unwrap();

        let payload = run(&args(dir.path().to_str().unwrap(), "greet.slim", vars));
        assert!(payload.starts_with("#<Slim_Error_for_python>: "));
        assert_eq!(payload.lines().count(), 1);
    }

    #[test]
    fn missing_template_yields_marker() {
        let dir = tempfile::tempdir().unwrap();
        let vars = dir.path().join("vars.json");
        fs::write(&vars, "{}").unwrap();

        let payload = run(&args(dir.path().to_str().unwrap(), "nope.slim", vars));
        assert!(payload.starts_with("#<Slim_Error_for_python>: "));
        assert!(payload.contains("nope.slim"));
    }

    #[test]
    fn write_payload_adds_single_newline() {
        let mut buf = Vec::new();
        write_payload(&mut buf, "Hello").unwrap();
        assert_eq!(buf, b"Hello\n");

        let mut buf = Vec::new();
        write_payload(&mut buf, "Hello\n").unwrap();
        assert_eq!(buf, b"Hello\n");
    }
}
