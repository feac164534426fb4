use log::{debug, warn};

use crate::types::{ClassAccessFlags, ClassFile};

use super::descriptor::{display_class_name, field_type, internal_to_source_name, package_name, simple_class_name};
use super::method::decompile_method;
use super::{DecompileError, DecompileOptions, Result};

/// The main decompiler entry point.
pub struct Decompiler {
    options: DecompileOptions,
}

impl Decompiler {
    pub fn new(options: DecompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecompileOptions {
        &self.options
    }

    /// Renders a whole class: package, header, fields, then every method.
    pub fn decompile(&self, class: &ClassFile) -> Result<String> {
        let class_name = class.this_class_name()?;
        debug!("decompiling class {}", class_name);

        let mut out = String::new();
        if let Some(package) = package_name(class_name) {
            out.push_str(&format!("package {};\n\n", internal_to_source_name(package)));
        }
        out.push_str(&self.class_header(class)?);
        out.push_str(" {\n");

        let indent = &self.options.indent;
        for field in &class.fields {
            let ty = field_type(field.descriptor(&class.const_pool)?)?;
            let mut parts: Vec<&str> = field.access_flags.keywords();
            let declaration = format!("{} {};", ty.display_name(), field.name(&class.const_pool)?);
            parts.push(&declaration);
            out.push_str(&format!("{}{}\n", indent, parts.join(" ")));
        }

        for result in self.decompile_methods(class) {
            let text = match result {
                Ok(text) => text,
                Err(e) if self.options.skip_failed_methods => {
                    warn!("{}: {}", class_name, e);
                    failed_method_comment(&e)
                }
                Err(e) => return Err(e),
            };
            out.push('\n');
            for line in text.lines() {
                out.push_str(indent);
                out.push_str(line);
                out.push('\n');
            }
        }

        out.push_str("}\n");
        Ok(out)
    }

    /// One result per method, in declaration order.
    pub fn decompile_methods(&self, class: &ClassFile) -> Vec<Result<String>> {
        let class_name = match class.this_class_name() {
            Ok(name) => name,
            Err(e) => return vec![Err(e)],
        };
        class
            .methods
            .iter()
            .map(|method| decompile_method(class_name, method, &class.const_pool, &self.options))
            .collect()
    }

    /// Decompile a single method by name.
    pub fn decompile_method(&self, class: &ClassFile, method_name: &str) -> Result<String> {
        let method = class
            .find_method(method_name)
            .ok_or_else(|| DecompileError::MethodNotFound {
                name: method_name.to_string(),
            })?;
        decompile_method(class.this_class_name()?, method, &class.const_pool, &self.options)
    }

    fn class_header(&self, class: &ClassFile) -> Result<String> {
        let flags = class.access_flags;
        let mut parts = Vec::new();
        if flags.contains(ClassAccessFlags::PUBLIC) {
            parts.push("public".to_string());
        }
        if flags.contains(ClassAccessFlags::FINAL) {
            parts.push("final".to_string());
        }
        let interface = flags.contains(ClassAccessFlags::INTERFACE);
        if flags.contains(ClassAccessFlags::ABSTRACT) && !interface {
            parts.push("abstract".to_string());
        }
        let kind = if flags.contains(ClassAccessFlags::ANNOTATION) {
            "@interface"
        } else if interface {
            "interface"
        } else if flags.contains(ClassAccessFlags::ENUM) {
            "enum"
        } else {
            "class"
        };
        parts.push(kind.to_string());
        parts.push(simple_class_name(class.this_class_name()?).to_string());

        if let Some(super_class) = class.super_class_name()? {
            if super_class != "java/lang/Object" {
                parts.push(format!("extends {}", display_class_name(super_class)));
            }
        }

        let interfaces = class
            .interfaces
            .iter()
            .map(|&index| class.const_pool.class_name(index).map(display_class_name))
            .collect::<Result<Vec<_>>>()?;
        if !interfaces.is_empty() {
            let keyword = if interface { "extends" } else { "implements" };
            parts.push(format!("{} {}", keyword, interfaces.join(", ")));
        }
        Ok(parts.join(" "))
    }
}

fn failed_method_comment(error: &DecompileError) -> String {
    match error {
        DecompileError::Method { method, source } => {
            format!("// Failed to decompile method: {}: {}", method, source.root())
        }
        other => format!("// Failed to decompile method: {}", other),
    }
}

/// Renders `class` with a one-off [`Decompiler`].
pub fn decompile_class(class: &ClassFile, options: &DecompileOptions) -> Result<String> {
    Decompiler::new(options.clone()).decompile(class)
}
