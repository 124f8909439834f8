//! Built-in toolkits shipped with the binary.
//!
//! These exist so the tool is usable out of the box and double as living
//! documentation of the schema model. Real toolkits are published into the
//! store by their authors.

use draftloom_core::domain::{
    AttributeDataType, AttributeSchema, AttributeValue, AutomationKind, AutomationSchema,
    Cardinality, CodeTemplateSchema, ElementSchema, PatternSchema, ToolkitDefinition,
    ToolkitVersion,
};

/// All built-in toolkits, latest versions.
pub fn all_toolkits() -> Vec<ToolkitDefinition> {
    vec![web_service()]
}

/// A small REST-service pattern: one `Api` endpoint element and a
/// collection of `Route`s, with a code template that renders a service
/// manifest.
pub fn web_service() -> ToolkitDefinition {
    let mut pattern = PatternSchema::new("builtin.webservice", "WebService");
    pattern.description = Some("A pattern for a small HTTP service".into());
    pattern.attributes.push(
        AttributeSchema::new("builtin.webservice.name", "Name", AttributeDataType::String)
            .required(),
    );
    pattern.attributes.push(
        AttributeSchema::new(
            "builtin.webservice.env",
            "Environment",
            AttributeDataType::String,
        )
        .with_default(AttributeValue::String("development".into()))
        .with_choices(vec![
            AttributeValue::String("development".into()),
            AttributeValue::String("staging".into()),
            AttributeValue::String("production".into()),
        ]),
    );

    let mut api = ElementSchema::new("builtin.webservice.api", "Api", Cardinality::One);
    api.attributes.push(
        AttributeSchema::new(
            "builtin.webservice.api.port",
            "Port",
            AttributeDataType::Integer,
        )
        .with_default(AttributeValue::Integer(8080)),
    );
    api.attributes.push(
        AttributeSchema::new(
            "builtin.webservice.api.host",
            "Host",
            AttributeDataType::String,
        )
        .with_default(AttributeValue::String("0.0.0.0".into())),
    );

    let mut routes = ElementSchema::new(
        "builtin.webservice.route",
        "Routes",
        Cardinality::OneOrMany,
    );
    routes.attributes.push(
        AttributeSchema::new(
            "builtin.webservice.route.path",
            "Path",
            AttributeDataType::String,
        )
        .required(),
    );
    routes.attributes.push(
        AttributeSchema::new(
            "builtin.webservice.route.method",
            "Method",
            AttributeDataType::String,
        )
        .with_default(AttributeValue::String("GET".into()))
        .with_choices(vec![
            AttributeValue::String("GET".into()),
            AttributeValue::String("POST".into()),
            AttributeValue::String("PUT".into()),
            AttributeValue::String("DELETE".into()),
        ]),
    );

    pattern.elements.push(api);
    pattern.elements.push(routes);

    pattern.code_templates.push(CodeTemplateSchema {
        id: "builtin.webservice.manifest".into(),
        name: "manifest".into(),
    });
    pattern.automation.push(AutomationSchema {
        id: "builtin.webservice.generate".into(),
        name: "generate".into(),
        launchable: true,
        kind: AutomationKind::CodeTemplateCommand {
            template_id: "builtin.webservice.manifest".into(),
            target_path: "{{Name}}/service.toml".into(),
        },
    });

    ToolkitDefinition::new(
        "builtin.webservice",
        ToolkitVersion::new(0, 1, 0),
        pattern,
    )
    .with_code_template(
        "builtin.webservice.manifest",
        "name = \"{{Name}}\"\nenvironment = \"{{Environment}}\"\n\n[api]\nhost = \"{{Api.Host}}\"\nport = {{Api.Port}}\n",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_toolkits_are_well_formed() {
        for toolkit in all_toolkits() {
            assert!(!toolkit.name().is_empty());
            // Every declared code-template command has packaged content.
            for automation in &toolkit.pattern.automation {
                if let AutomationKind::CodeTemplateCommand { template_id, .. } = &automation.kind {
                    assert!(
                        toolkit.code_template_content(template_id).is_some(),
                        "missing template content for {template_id}"
                    );
                }
            }
        }
    }
}
