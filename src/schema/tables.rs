//! Static attribute and content tables for every node kind.
//!
//! This is the single source of truth the codec, the validator and the typed
//! views read from. Attribute order is declaration order and is the order the
//! codec writes attributes in.

use super::literals::{
    ConfigVersion, CreateConnector, EnableCorrelation, EndpointType, ExhaustedAction,
    InitialState, InitialisationPolicy, PoolExhaustedAction, ThreadingProfileId,
    TransactionAction,
};
use super::{AttributeSpec as A, ChildSpec as C, KindSchema, NodeKind, RefPolicy, ReferenceKind};

static MULE_CONFIGURATION: &[A] = &[
    A::text("id"),
    A::literal("version", ConfigVersion::LITERALS).required(),
];

static MULE_ENVIRONMENT_PROPERTIES: &[A] = &[
    A::boolean("synchronous", "false"),
    A::text("serverUrl"),
    A::boolean("remoteSync", "false"),
    A::integer("synchronousEventTimeout"),
    A::integer("transactionTimeout"),
    A::text("workingDirectory").with_default("./.mule"),
    A::boolean("clientMode", "false"),
    A::boolean("embedded", "false"),
    A::boolean("enableMessageEvents", "false"),
    A::text("encoding"),
    A::text("model"),
    A::boolean("recoverableMode", "false"),
];

static THREADING_PROFILE: &[A] = &[
    A::literal("id", ThreadingProfileId::LITERALS).with_default("default"),
    A::integer("maxBufferSize"),
    A::integer("maxThreadsActive"),
    A::integer("maxThreadsIdle"),
    A::integer("threadTTL"),
    A::integer("threadWaitTimeout"),
    A::literal("poolExhaustedAction", PoolExhaustedAction::LITERALS).with_default("RUN"),
    A::boolean("doThreading", "true"),
];

static POOLING_PROFILE: &[A] = &[
    A::literal("exhaustedAction", ExhaustedAction::LITERALS).with_default("GROW"),
    A::integer("maxActive"),
    A::integer("maxIdle"),
    A::integer("maxWait"),
    A::text("factory"),
    A::literal("initialisationPolicy", InitialisationPolicy::LITERALS)
        .with_default("INITIALISE_FIRST"),
];

static QUEUE_PROFILE: &[A] = &[
    A::integer("maxOutstandingMessages"),
    A::boolean("persistent", "false"),
];

static CLASS_DEFINITION: &[A] = &[A::text("className").required()];

static CONTAINER_CONTEXT: &[A] = &[A::text("name"), A::text("className").required()];

/// Both optional: without either the runtime's default manager is used.
static SECURITY_MANAGER: &[A] = &[A::text("className"), A::text("ref")];

static SECURITY_PROVIDER: &[A] = &[
    A::text("name").required(),
    A::text("className").required(),
    A::text("ref"),
];

static TRANSACTION_MANAGER: &[A] = &[A::text("factory").required()];

static NAMED_CLASS: &[A] = &[A::text("name").required(), A::text("className").required()];

static ENDPOINT_IDENTIFIER: &[A] = &[A::text("name").required(), A::text("value").required()];

static TRANSFORMER: &[A] = &[
    A::text("name").required(),
    A::text("className").required(),
    A::text("returnClass"),
    A::boolean("ignoreBadInput", "false"),
];

static CATALOG_ENDPOINT: &[A] = &[
    A::text("name").required(),
    A::text("address").required(),
    A::text("connector").references(ReferenceKind::Connector),
    A::literal("type", EndpointType::LITERALS).with_default("senderAndReceiver"),
    A::names("transformers").references(ReferenceKind::Transformer),
    A::names("responseTransformers").references(ReferenceKind::Transformer),
    A::boolean("synchronous", "false"),
    A::boolean("remoteSync", "false"),
    A::integer("remoteSyncTimeout"),
    A::literal("createConnector", CreateConnector::LITERALS).with_default("GET_OR_CREATE"),
];

static ENDPOINT: &[A] = &[
    A::text("name"),
    A::text("address"),
    A::text("ref").references(ReferenceKind::Endpoint),
    A::text("connector").references(ReferenceKind::Connector),
    A::literal("type", EndpointType::LITERALS).with_default("senderAndReceiver"),
    A::names("transformers").references(ReferenceKind::Transformer),
    A::names("responseTransformers").references(ReferenceKind::Transformer),
    A::boolean("synchronous", "false"),
    A::boolean("remoteSync", "false"),
    A::integer("remoteSyncTimeout"),
    A::literal("createConnector", CreateConnector::LITERALS).with_default("GET_OR_CREATE"),
];

static GLOBAL_ENDPOINT: &[A] = &[
    A::text("name").required().references(ReferenceKind::Endpoint),
    A::text("address"),
    A::names("transformers").references(ReferenceKind::Transformer),
    A::names("responseTransformers").references(ReferenceKind::Transformer),
    A::boolean("synchronous", "false"),
    A::boolean("remoteSync", "false"),
    A::integer("remoteSyncTimeout"),
];

static TRANSACTION: &[A] = &[
    A::literal("action", TransactionAction::LITERALS).required(),
    A::text("factory").required(),
    A::integer("timeout"),
];

static CONSTRAINT: &[A] = &[
    A::text("className").required(),
    A::integer("batchSize"),
    A::integer("frequency"),
];

static FILTER: &[A] = &[
    A::text("className").required(),
    A::text("expectedType"),
    A::text("expression"),
    A::text("pattern"),
    A::text("path"),
    A::text("configFile"),
];

static SECURITY_FILTER: &[A] = &[A::text("className").required(), A::text("useProviders")];

static INTERCEPTOR_STACK: &[A] = &[A::text("name").required()];

static INTERCEPTOR: &[A] = &[
    A::text("className"),
    A::text("name")
        .references_with(ReferenceKind::InterceptorStack, RefPolicy::UnlessSet("className")),
];

static MODEL: &[A] = &[
    A::text("name"),
    A::text("type").with_default("seda"),
    A::text("className"),
];

static MULE_DESCRIPTOR: &[A] = &[
    A::text("name").required(),
    A::text("implementation").required(),
    A::text("version"),
    A::boolean("singleton", "false"),
    A::boolean("containerManaged", "true"),
    A::literal("initialState", InitialState::LITERALS).with_default("started"),
    A::text("inboundEndpoint")
        .references_with(ReferenceKind::Endpoint, RefPolicy::AddressOrName),
    A::text("outboundEndpoint")
        .references_with(ReferenceKind::Endpoint, RefPolicy::AddressOrName),
    A::names("inboundTransformer").references(ReferenceKind::Transformer),
    A::names("outboundTransformer").references(ReferenceKind::Transformer),
    A::names("responseTransformer").references(ReferenceKind::Transformer),
    A::text("ref"),
];

static ROUTER_COLLECTION: &[A] = &[A::boolean("matchAll", "false")];

static RESPONSE_ROUTER: &[A] = &[A::integer("timeout")];

static ROUTER: &[A] = &[
    A::text("className").required(),
    A::literal("enableCorrelation", EnableCorrelation::LITERALS).with_default("IF_NOT_SET"),
    A::text("propertyExtractor"),
];

static REPLY_TO: &[A] = &[A::text("address").required()];

static PROPERTY: &[A] = &[A::text("name").required(), A::text("value").required()];

static NAMED: &[A] = &[A::text("name").required()];

static SYSTEM_PROPERTY: &[A] = &[
    A::text("name").required(),
    A::text("key").required(),
    A::text("defaultValue"),
];

static FACTORY_PROPERTY: &[A] = &[A::text("name").required(), A::text("factory").required()];

static FILE_PROPERTIES: &[A] = &[
    A::text("location").required(),
    A::boolean("override", "true"),
];

static LIST_ENTRY: &[A] = &[A::text("value").required()];

static NONE: &[A] = &[];

fn endpoint_children() -> Vec<C> {
    vec![
        C::optional("transaction", NodeKind::Transaction),
        C::optional("filter", NodeKind::Filter),
        C::optional("security-filter", NodeKind::SecurityFilter),
        C::optional("properties", NodeKind::Properties),
    ]
}

fn properties_only() -> Vec<C> {
    vec![C::optional("properties", NodeKind::Properties)]
}

/// Build the schema of a single kind.
pub(super) fn kind_schema(kind: NodeKind) -> KindSchema {
    let (attributes, children, allows_mixed_content, has_text_content): (&'static [A], Vec<C>, bool, bool) =
        match kind {
            NodeKind::MuleConfiguration => (
                MULE_CONFIGURATION,
                vec![
                    C::optional("description", NodeKind::Description),
                    C::optional("environment-properties", NodeKind::Properties),
                    C::optional("mule-environment-properties", NodeKind::MuleEnvironmentProperties),
                    C::many("container-context", NodeKind::ContainerContext),
                    C::optional("security-manager", NodeKind::SecurityManager),
                    C::optional("transaction-manager", NodeKind::TransactionManager),
                    C::optional("agents", NodeKind::Agents),
                    C::many("connector", NodeKind::Connector),
                    C::optional("endpoint-identifiers", NodeKind::EndpointIdentifiers),
                    C::optional("transformers", NodeKind::Transformers),
                    C::optional("global-endpoints", NodeKind::GlobalEndpoints),
                    C::many("interceptor-stack", NodeKind::InterceptorStack),
                    C::optional("model", NodeKind::Model),
                    C::many("mule-descriptor", NodeKind::MuleDescriptor),
                ],
                true,
                false,
            ),
            NodeKind::Description => (NONE, Vec::new(), false, true),
            NodeKind::MuleEnvironmentProperties => (
                MULE_ENVIRONMENT_PROPERTIES,
                vec![
                    C::many("threading-profile", NodeKind::ThreadingProfile),
                    C::optional("pooling-profile", NodeKind::PoolingProfile),
                    C::optional("queue-profile", NodeKind::QueueProfile),
                    C::optional("persistence-strategy", NodeKind::ClassDefinition),
                    C::optional("connection-strategy", NodeKind::ClassDefinition),
                ],
                false,
                false,
            ),
            NodeKind::ThreadingProfile => (THREADING_PROFILE, Vec::new(), false, false),
            NodeKind::PoolingProfile => (POOLING_PROFILE, Vec::new(), false, false),
            NodeKind::QueueProfile => (QUEUE_PROFILE, properties_only(), false, false),
            NodeKind::ClassDefinition => (CLASS_DEFINITION, properties_only(), false, false),
            NodeKind::ContainerContext => (CONTAINER_CONTEXT, properties_only(), false, false),
            NodeKind::SecurityManager => (
                SECURITY_MANAGER,
                vec![
                    C::many("security-provider", NodeKind::SecurityProvider),
                    C::many("encryption-strategy", NodeKind::EncryptionStrategy),
                ],
                false,
                false,
            ),
            NodeKind::SecurityProvider => (SECURITY_PROVIDER, properties_only(), false, false),
            NodeKind::EncryptionStrategy => (NAMED_CLASS, properties_only(), false, false),
            NodeKind::TransactionManager => (TRANSACTION_MANAGER, properties_only(), false, false),
            NodeKind::Agents => (NONE, vec![C::many("agent", NodeKind::Agent)], false, false),
            NodeKind::Agent => (NAMED_CLASS, properties_only(), false, false),
            NodeKind::Connector => (
                NAMED_CLASS,
                vec![
                    C::optional("properties", NodeKind::Properties),
                    C::many("threading-profile", NodeKind::ThreadingProfile),
                    C::optional("exception-strategy", NodeKind::ExceptionStrategy),
                    C::optional("connection-strategy", NodeKind::ClassDefinition),
                ],
                false,
                false,
            ),
            NodeKind::ExceptionStrategy => (
                CLASS_DEFINITION,
                vec![
                    C::optional("endpoint", NodeKind::Endpoint),
                    C::optional("global-endpoint", NodeKind::GlobalEndpoint),
                    C::optional("properties", NodeKind::Properties),
                ],
                false,
                false,
            ),
            NodeKind::EndpointIdentifiers => (
                NONE,
                vec![C::many("endpoint-identifier", NodeKind::EndpointIdentifier)],
                false,
                false,
            ),
            NodeKind::EndpointIdentifier => (ENDPOINT_IDENTIFIER, Vec::new(), false, false),
            NodeKind::Transformers => {
                (NONE, vec![C::many("transformer", NodeKind::Transformer)], false, false)
            }
            NodeKind::Transformer => (TRANSFORMER, properties_only(), false, false),
            NodeKind::GlobalEndpoints => {
                (NONE, vec![C::many("endpoint", NodeKind::CatalogEndpoint)], false, false)
            }
            NodeKind::CatalogEndpoint => (CATALOG_ENDPOINT, endpoint_children(), false, false),
            NodeKind::Endpoint => (ENDPOINT, endpoint_children(), false, false),
            NodeKind::GlobalEndpoint => (GLOBAL_ENDPOINT, endpoint_children(), false, false),
            NodeKind::Transaction => (
                TRANSACTION,
                vec![C::optional("constraint", NodeKind::Constraint)],
                false,
                false,
            ),
            NodeKind::Constraint => {
                (CONSTRAINT, vec![C::optional("filter", NodeKind::Filter)], false, false)
            }
            NodeKind::Filter => (
                FILTER,
                vec![
                    C::optional("properties", NodeKind::Properties),
                    C::optional("filter", NodeKind::Filter),
                    C::optional("left-filter", NodeKind::Filter),
                    C::optional("right-filter", NodeKind::Filter),
                ],
                false,
                false,
            ),
            NodeKind::SecurityFilter => (SECURITY_FILTER, properties_only(), false, false),
            NodeKind::InterceptorStack => (
                INTERCEPTOR_STACK,
                vec![C::many("interceptor", NodeKind::StackInterceptor)],
                false,
                false,
            ),
            NodeKind::StackInterceptor => (CLASS_DEFINITION, properties_only(), false, false),
            NodeKind::Interceptor => (INTERCEPTOR, properties_only(), false, false),
            NodeKind::Model => (
                MODEL,
                vec![
                    C::optional("description", NodeKind::Description),
                    C::optional("entry-point-resolver", NodeKind::ClassDefinition),
                    C::optional("component-factory", NodeKind::ClassDefinition),
                    C::optional("component-lifecycle-adapter-factory", NodeKind::ClassDefinition),
                    C::optional("component-pool-factory", NodeKind::ClassDefinition),
                    C::optional("exception-strategy", NodeKind::ExceptionStrategy),
                    C::many("mule-descriptor", NodeKind::MuleDescriptor),
                ],
                true,
                false,
            ),
            NodeKind::MuleDescriptor => (
                MULE_DESCRIPTOR,
                vec![
                    C::optional("inbound-router", NodeKind::InboundRouter),
                    C::optional("outbound-router", NodeKind::OutboundRouter),
                    C::optional("response-router", NodeKind::ResponseRouter),
                    C::many("interceptor", NodeKind::Interceptor),
                    C::optional("threading-profile", NodeKind::ThreadingProfile),
                    C::optional("pooling-profile", NodeKind::PoolingProfile),
                    C::optional("queue-profile", NodeKind::QueueProfile),
                    C::optional("exception-strategy", NodeKind::ExceptionStrategy),
                    C::optional("properties", NodeKind::Properties),
                ],
                true,
                false,
            ),
            NodeKind::InboundRouter => (
                ROUTER_COLLECTION,
                vec![
                    C::optional("catch-all-strategy", NodeKind::CatchAllStrategy),
                    C::many("endpoint", NodeKind::Endpoint),
                    C::many("global-endpoint", NodeKind::GlobalEndpoint),
                    C::many("router", NodeKind::Router),
                ],
                false,
                false,
            ),
            NodeKind::OutboundRouter => (
                ROUTER_COLLECTION,
                vec![
                    C::optional("catch-all-strategy", NodeKind::CatchAllStrategy),
                    C::many("router", NodeKind::Router),
                ],
                false,
                false,
            ),
            NodeKind::ResponseRouter => (
                RESPONSE_ROUTER,
                vec![
                    C::many("endpoint", NodeKind::Endpoint),
                    C::many("global-endpoint", NodeKind::GlobalEndpoint),
                    C::many("router", NodeKind::Router),
                ],
                false,
                false,
            ),
            NodeKind::Router => (
                ROUTER,
                vec![
                    C::many("endpoint", NodeKind::Endpoint),
                    C::many("global-endpoint", NodeKind::GlobalEndpoint),
                    C::optional("reply-to", NodeKind::ReplyTo),
                    C::optional("transaction", NodeKind::Transaction),
                    C::optional("filter", NodeKind::Filter),
                    C::optional("properties", NodeKind::Properties),
                ],
                false,
                false,
            ),
            NodeKind::ReplyTo => (REPLY_TO, Vec::new(), false, false),
            NodeKind::CatchAllStrategy => (
                CLASS_DEFINITION,
                vec![
                    C::optional("endpoint", NodeKind::Endpoint),
                    C::optional("global-endpoint", NodeKind::GlobalEndpoint),
                    C::optional("properties", NodeKind::Properties),
                ],
                false,
                false,
            ),
            NodeKind::Properties => (
                NONE,
                vec![
                    C::many("property", NodeKind::Property),
                    C::many("text-property", NodeKind::TextProperty),
                    C::many("system-property", NodeKind::SystemProperty),
                    C::many("factory-property", NodeKind::FactoryProperty),
                    C::many("map", NodeKind::MapProperty),
                    C::many("list", NodeKind::ListProperty),
                    C::many("file-properties", NodeKind::FileProperties),
                ],
                true,
                false,
            ),
            NodeKind::Property => (PROPERTY, Vec::new(), false, false),
            NodeKind::TextProperty => (NAMED, Vec::new(), false, true),
            NodeKind::SystemProperty => (SYSTEM_PROPERTY, Vec::new(), false, false),
            NodeKind::FactoryProperty => (FACTORY_PROPERTY, Vec::new(), false, false),
            NodeKind::FileProperties => (FILE_PROPERTIES, Vec::new(), false, false),
            NodeKind::MapProperty => (
                NAMED,
                vec![
                    C::many("property", NodeKind::Property),
                    C::many("system-property", NodeKind::SystemProperty),
                    C::many("map", NodeKind::MapProperty),
                    C::many("list", NodeKind::ListProperty),
                ],
                false,
                false,
            ),
            NodeKind::ListProperty => {
                (NAMED, vec![C::many("entry", NodeKind::ListEntry)], false, false)
            }
            NodeKind::ListEntry => (LIST_ENTRY, Vec::new(), false, false),
        };

    KindSchema { kind, attributes, children, allows_mixed_content, has_text_content }
}
