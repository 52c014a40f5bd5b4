//! Integration tests for value resolution against an in-memory database.

use dbconfig::error::ConfigError;
use dbconfig::overrides::{Extension, OverrideNode};
use dbconfig::resolver::Resolver;
use dbconfig::schema::definition::{DefinitionNode, SchemaDefinition};
use dbconfig::schema::provider::RegistryProvider;
use dbconfig::store::Database;
use dbconfig::types::{Kind, Value};
use dbconfig::writer::OverrideWriter;

/// Schema from the db.host/db.port scenario: a string with default
/// "localhost" and an int with default 5432.
fn app_definition() -> SchemaDefinition {
    SchemaDefinition {
        name: "app".to_string(),
        nodes: vec![
            DefinitionNode::array(
                "db",
                vec![
                    DefinitionNode::scalar("host", Kind::Str, "localhost"),
                    DefinitionNode::scalar("port", Kind::Int, 5432i64),
                ],
            ),
            DefinitionNode::scalar("debug", Kind::Bool, false),
            DefinitionNode::scalar("ratio", Kind::Float, 0.5),
        ],
    }
}

/// Route engine log output through the test writer; `RUST_LOG` filters it.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn setup() -> Resolver<RegistryProvider, Database> {
    init_tracing();
    let db = Database::open_in_memory().expect("Failed to create in-memory database");
    let mut provider = RegistryProvider::new();
    provider.register("app", app_definition());
    Resolver::new(provider, db)
}

mod default_resolution {
    use super::*;

    #[test]
    fn returns_declared_defaults_without_overrides() {
        let resolver = setup();
        assert_eq!(
            resolver.value("app", "", "db.host").unwrap(),
            Value::Str("localhost".to_string())
        );
        assert_eq!(resolver.value("app", "", "db.port").unwrap(), Value::Int(5432));
        assert_eq!(resolver.value("app", "", "debug").unwrap(), Value::Bool(false));
        assert_eq!(resolver.value("app", "", "ratio").unwrap(), Value::Float(0.5));
    }

    #[test]
    fn unknown_key_fails_with_key_not_found() {
        let resolver = setup();
        assert!(matches!(
            resolver.value("app", "", "db.unknown"),
            Err(ConfigError::KeyNotFound(_))
        ));
        assert!(matches!(
            resolver.value("app", "", "db"),
            Err(ConfigError::KeyNotFound(_))
        ));
    }

    #[test]
    fn unknown_schema_fails_with_schema_error() {
        let resolver = setup();
        assert!(matches!(
            resolver.value("missing", "", "db.host"),
            Err(ConfigError::Schema(_))
        ));
    }
}

mod override_resolution {
    use super::*;

    /// Resolver and writer sharing one database handle.
    fn setup_pair() -> (
        Resolver<RegistryProvider, Database>,
        OverrideWriter<Database>,
    ) {
        init_tracing();
        let db = Database::open_in_memory().expect("Failed to create in-memory database");
        let mut provider = RegistryProvider::new();
        provider.register("app", app_definition());
        let writer = OverrideWriter::new(db.clone());
        (Resolver::new(provider, db), writer)
    }

    fn db_port_override(port: &str) -> Vec<OverrideNode> {
        vec![OverrideNode::interior(
            "db",
            vec![OverrideNode::leaf("port", port)],
        )]
    }

    #[test]
    fn stored_override_wins_over_default_and_is_typed() {
        let (resolver, writer) = setup_pair();

        let mut ext = Extension::new("app", "");
        ext.nodes = db_port_override("6000");
        writer.replace(&mut ext).unwrap();

        assert_eq!(resolver.value("app", "", "db.port").unwrap(), Value::Int(6000));
        // untouched sibling still resolves to its default
        assert_eq!(
            resolver.value("app", "", "db.host").unwrap(),
            Value::Str("localhost".to_string())
        );
    }

    #[test]
    fn namespaces_are_isolated() {
        let (resolver, writer) = setup_pair();

        let mut tenant = Extension::new("app", "tenant1");
        tenant.nodes = db_port_override("7000");
        writer.replace(&mut tenant).unwrap();

        assert_eq!(
            resolver.value("app", "tenant1", "db.port").unwrap(),
            Value::Int(7000)
        );
        assert_eq!(resolver.value("app", "", "db.port").unwrap(), Value::Int(5432));
    }

    #[test]
    fn coercion_round_trips_bool_int_float() {
        let (resolver, writer) = setup_pair();

        let mut ext = Extension::new("app", "");
        ext.nodes = vec![
            OverrideNode::interior("db", vec![OverrideNode::leaf("port", "42")]),
            OverrideNode::leaf("debug", "true"),
            OverrideNode::leaf("ratio", "3.14"),
        ];
        writer.replace(&mut ext).unwrap();

        assert_eq!(resolver.value("app", "", "db.port").unwrap(), Value::Int(42));
        assert_eq!(resolver.value("app", "", "debug").unwrap(), Value::Bool(true));
        assert_eq!(resolver.value("app", "", "ratio").unwrap(), Value::Float(3.14));
    }

    #[test]
    fn unparsable_stored_value_surfaces_coercion_error() {
        let (resolver, writer) = setup_pair();

        let mut ext = Extension::new("app", "");
        ext.nodes = db_port_override("not-a-number");
        writer.replace(&mut ext).unwrap();

        // never silently substituted by the default
        assert!(matches!(
            resolver.value("app", "", "db.port"),
            Err(ConfigError::TypeCoercion { .. })
        ));
    }

    #[test]
    fn empty_string_override_resolves_as_empty_str() {
        let (resolver, writer) = setup_pair();

        let mut ext = Extension::new("app", "");
        ext.nodes = vec![OverrideNode::interior(
            "db",
            vec![OverrideNode::leaf("host", "")],
        )];
        writer.replace(&mut ext).unwrap();

        assert_eq!(
            resolver.value("app", "", "db.host").unwrap(),
            Value::Str(String::new())
        );
    }

    #[test]
    fn override_tree_shape_mismatch_falls_back_to_default() {
        let (resolver, writer) = setup_pair();

        // stored as a top-level leaf although the schema nests it
        let mut ext = Extension::new("app", "");
        ext.nodes = vec![OverrideNode::leaf("db", "oops")];
        writer.replace(&mut ext).unwrap();

        assert_eq!(
            resolver.value("app", "", "db.host").unwrap(),
            Value::Str("localhost".to_string())
        );
    }
}
