//! The compiled-in catalogue of architecture styles

use crate::dataset::{AttributeRecord, Catalogue, CatalogueRecord, CategoryRecord, EntityRecord};
use crate::error::Result;

const ATTRIBUTES: [(&str, &str); 4] = [
    ("structure", "Structure"),
    ("granularity", "Granularity"),
    ("focus", "Focus"),
    ("coupling", "Coupling"),
];

const CATEGORIES: [(&str, &str, &str); 3] = [
    ("structural", "Structural", "#2563eb"),
    ("strategic", "Strategic", "#059669"),
    ("deployment", "Deployment", "#d97706"),
];

struct Style {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    url: &'static str,
    description: &'static str,
    /// structure, granularity, focus, coupling
    values: [f32; 4],
}

const STYLES: &[Style] = &[
    Style {
        id: "monolith",
        name: "Monolith",
        category: "deployment",
        url: "https://en.wikipedia.org/wiki/Monolithic_application",
        description: "A single deployable application (often one codebase + one database). It can be perfectly fine for many teams, but tends to create high coupling over time if boundaries are not enforced.",
        values: [5.0, 5.0, 10.0, 90.0],
    },
    Style {
        id: "modular-monolith",
        name: "Modular Monolith",
        category: "deployment",
        url: "https://martinfowler.com/articles/modular-monolith.html",
        description: "Still one deployable unit, but internally split into clear modules / bounded contexts with enforced boundaries. A pragmatic middle step before microservices, keeping operational simplicity while improving coupling and testability.",
        values: [65.0, 15.0, 75.0, 45.0],
    },
    Style {
        id: "layered",
        name: "Layered Architecture",
        category: "structural",
        url: "https://en.wikipedia.org/wiki/Layered_architecture",
        description: "Separates UI, business rules, and data access into strict layers. Great for learning and simple CRUD, but can hard-wire dependencies and make domain logic drift into the wrong layer.",
        values: [10.0, 10.0, 20.0, 70.0],
    },
    Style {
        id: "hexagonal",
        name: "Hexagonal (Ports & Adapters)",
        category: "structural",
        url: "https://alistair.cockburn.us/hexagonal-architecture/",
        description: "Puts the domain and use cases in the center. External technology (web, DB, messaging) connects via ports (interfaces) and adapters (implementations), making testing easier and technology swaps safer.",
        values: [85.0, 20.0, 65.0, 20.0],
    },
    Style {
        id: "onion",
        name: "Onion Architecture",
        category: "structural",
        url: "https://jeffreypalermo.com/2008/07/the-onion-architecture-part-1/",
        description: "A domain-centric layering where all dependencies point inward. Infrastructure is kept at the edges, while the core domain stays independent; encourages clear boundaries and testability.",
        values: [80.0, 20.0, 70.0, 20.0],
    },
    Style {
        id: "clean",
        name: "Clean Architecture",
        category: "structural",
        url: "https://8thlight.com/blog/uncle-bob/2012/08/13/the-clean-architecture.html",
        description: "Generalizes inside-out dependency rules with concentric rings: entities, use cases, interface adapters, frameworks. Helps keep business rules stable while allowing UI/DB/framework changes.",
        values: [90.0, 25.0, 70.0, 15.0],
    },
    Style {
        id: "ddd",
        name: "Domain-Driven Design (DDD)",
        category: "strategic",
        url: "https://en.wikipedia.org/wiki/Domain-driven_design",
        description: "A strategic approach to align software with the business model: ubiquitous language, bounded contexts, aggregates, and domain events. Often combined with modular structures to reduce complexity.",
        values: [65.0, 45.0, 95.0, 40.0],
    },
    Style {
        id: "microservices",
        name: "Microservices",
        category: "deployment",
        url: "https://martinfowler.com/articles/microservices.html",
        description: "A distributed style with small, independently deployable services, each owning its data and lifecycle. Enables independent scaling and delivery, but increases operational, observability, and integration complexity.",
        values: [55.0, 95.0, 70.0, 25.0],
    },
    Style {
        id: "eda",
        name: "Event-Driven Architecture",
        category: "deployment",
        url: "https://en.wikipedia.org/wiki/Event-driven_architecture",
        description: "Components publish events instead of calling each other directly. Promotes loose coupling and scalability, but requires careful handling of ordering, retries, and eventual consistency.",
        values: [60.0, 70.0, 65.0, 15.0],
    },
    Style {
        id: "cqrs",
        name: "CQRS",
        category: "structural",
        url: "https://martinfowler.com/bliki/CQRS.html",
        description: "Separates command (write) and query (read) responsibilities, often with different models and storage. While technically a pattern, it significantly impacts the structural focus of an application.",
        values: [70.0, 55.0, 75.0, 30.0],
    },
    Style {
        id: "event-sourcing",
        name: "Event Sourcing",
        category: "structural",
        url: "https://martinfowler.com/eaaDev/EventSourcing.html",
        description: "Captures all changes to an application state as a sequence of events. Instead of storing current state, it stores the history of events, enabling audit logs, time-travel, and high decoupling.",
        values: [75.0, 60.0, 80.0, 20.0],
    },
    Style {
        id: "saga",
        name: "Saga Pattern",
        category: "structural",
        url: "https://microservices.io/patterns/data/saga.html",
        description: "Manages distributed transactions by using a sequence of local transactions, each updating its own database and publishing an event or message to trigger the next transaction.",
        values: [65.0, 80.0, 70.0, 35.0],
    },
    Style {
        id: "soa",
        name: "SOA",
        category: "deployment",
        url: "https://en.wikipedia.org/wiki/Service-oriented_architecture",
        description: "Enterprise service orientation with shared contracts and governance, often mediated by an ESB. Useful for large heterogeneous landscapes, but can become centralized and heavyweight if overused.",
        values: [45.0, 80.0, 55.0, 45.0],
    },
    Style {
        id: "serverless",
        name: "Serverless",
        category: "deployment",
        url: "https://en.wikipedia.org/wiki/Serverless_computing",
        description: "Runs code as on-demand functions managed by a cloud provider. Reduces server ops and scales automatically; trade-offs include vendor lock-in, cold starts, and debugging distributed flows.",
        values: [50.0, 100.0, 45.0, 25.0],
    },
    Style {
        id: "pipe-filter",
        name: "Pipe & Filter",
        category: "structural",
        url: "https://en.wikipedia.org/wiki/Pipeline_(software)",
        description: "A processing pipeline where data flows through a chain of independent transformation steps (filters). Excellent for ETL, compilers, and streaming; each step stays focused and replaceable.",
        values: [70.0, 45.0, 35.0, 30.0],
    },
    Style {
        id: "clean-architecture",
        name: "Clean Architecture",
        category: "structural",
        url: "https://blog.cleancoder.com/uncle-bob/2012/08/13/the-clean-architecture.html",
        description: "A variation of Onion/Hexagonal architecture by Robert C. Martin. It emphasizes dependency inversion and strict boundaries to keep the core business logic independent of frameworks and UI.",
        values: [90.0, 20.0, 80.0, 15.0],
    },
    Style {
        id: "data-mesh",
        name: "Data Mesh",
        category: "strategic",
        url: "https://martinfowler.com/articles/data-mesh-principles.html",
        description: "A decentralized architectural framework for data management. It treats data as a product and shifts ownership to domain-aligned teams, applying microservices principles to the data world.",
        values: [60.0, 85.0, 90.0, 40.0],
    },
    Style {
        id: "p2p",
        name: "Peer-to-Peer",
        category: "deployment",
        url: "https://en.wikipedia.org/wiki/Peer-to-peer",
        description: "A decentralized network where participants (peers) are equally privileged and share resources directly without a central server. Highly resilient but complex to coordinate.",
        values: [30.0, 100.0, 20.0, 10.0],
    },
    Style {
        id: "blackboard",
        name: "Blackboard",
        category: "structural",
        url: "https://en.wikipedia.org/wiki/Blackboard_system",
        description: "Specialized architectural style for problems with no deterministic solution. Multiple independent \"experts\" (knowledge sources) work on a shared data store (blackboard) to build a solution.",
        values: [40.0, 50.0, 30.0, 40.0],
    },
];

/// The built-in catalogue as an unvalidated document
pub fn builtin_record() -> CatalogueRecord {
    CatalogueRecord {
        attributes: ATTRIBUTES
            .iter()
            .map(|(key, label)| AttributeRecord {
                key: key.to_string(),
                label: label.to_string(),
            })
            .collect(),
        categories: CATEGORIES
            .iter()
            .map(|(key, label, color)| CategoryRecord {
                key: key.to_string(),
                label: label.to_string(),
                color: color.to_string(),
            })
            .collect(),
        entities: STYLES
            .iter()
            .map(|style| EntityRecord {
                id: style.id.to_string(),
                name: style.name.to_string(),
                category: style.category.to_string(),
                description: style.description.to_string(),
                url: Some(style.url.to_string()),
                values: ATTRIBUTES
                    .iter()
                    .zip(style.values)
                    .map(|((key, _), value)| (key.to_string(), value))
                    .collect(),
            })
            .collect(),
    }
}

impl Catalogue {
    /// The compiled-in catalogue, validated like any other document
    pub fn builtin() -> Result<Self> {
        Self::from_record(builtin_record())
    }
}
