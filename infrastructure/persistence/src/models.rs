use business::domain::database::schema::{ColumnDefinition, SchemaRegistry, TableDefinition};
use business::domain::errors::DatabaseError;

/// Repair requests tracked on the kanban board.
pub fn service_requests() -> TableDefinition {
    TableDefinition::new("service_requests")
        .column(
            ColumnDefinition::new("id", "UUID")
                .primary_key()
                .default_value("gen_random_uuid()"),
        )
        .column(ColumnDefinition::new("case_id", "VARCHAR(32)").not_null().unique())
        .column(ColumnDefinition::new("name", "VARCHAR(255)").not_null())
        .column(ColumnDefinition::new("email", "VARCHAR(255)").not_null())
        .column(ColumnDefinition::new("phone", "VARCHAR(50)"))
        .column(ColumnDefinition::new("device_type", "VARCHAR(100)").not_null())
        .column(ColumnDefinition::new("problem_description", "TEXT").not_null())
        .column(
            ColumnDefinition::new("urgency", "VARCHAR(20)")
                .not_null()
                .default_value("'normal'"),
        )
        .column(ColumnDefinition::new("price", "NUMERIC(10, 2)"))
        .column(
            ColumnDefinition::new("status", "VARCHAR(20)")
                .not_null()
                .default_value("'pending'"),
        )
        .column(
            ColumnDefinition::new("created_at", "TIMESTAMPTZ")
                .not_null()
                .default_value("now()"),
        )
        .column(ColumnDefinition::new("started_at", "TIMESTAMPTZ"))
        .column(ColumnDefinition::new("completed_at", "TIMESTAMPTZ"))
        .constraint(
            "CHECK (status IN ('pending', 'in_progress', 'completed', 'picked_up', 'archived'))",
        )
}

/// Messages sent through the public contact form.
pub fn contact_messages() -> TableDefinition {
    TableDefinition::new("contact_messages")
        .column(
            ColumnDefinition::new("id", "UUID")
                .primary_key()
                .default_value("gen_random_uuid()"),
        )
        .column(ColumnDefinition::new("name", "VARCHAR(255)").not_null())
        .column(ColumnDefinition::new("email", "VARCHAR(255)").not_null())
        .column(ColumnDefinition::new("phone", "VARCHAR(50)"))
        .column(ColumnDefinition::new("message", "TEXT").not_null())
        .column(
            ColumnDefinition::new("status", "VARCHAR(20)")
                .not_null()
                .default_value("'new'"),
        )
        .column(
            ColumnDefinition::new("created_at", "TIMESTAMPTZ")
                .not_null()
                .default_value("now()"),
        )
}

pub fn testimonials() -> TableDefinition {
    TableDefinition::new("testimonials")
        .column(
            ColumnDefinition::new("id", "UUID")
                .primary_key()
                .default_value("gen_random_uuid()"),
        )
        .column(ColumnDefinition::new("name", "VARCHAR(255)").not_null())
        .column(ColumnDefinition::new("content", "TEXT").not_null())
        .column(ColumnDefinition::new("rating", "SMALLINT").not_null())
        .column(
            ColumnDefinition::new("approved", "BOOLEAN")
                .not_null()
                .default_value("FALSE"),
        )
        .column(
            ColumnDefinition::new("created_at", "TIMESTAMPTZ")
                .not_null()
                .default_value("now()"),
        )
        .constraint("CHECK (rating BETWEEN 1 AND 5)")
}

/// Every table the backend owns, in creation order.
pub fn registry() -> Result<SchemaRegistry, DatabaseError> {
    SchemaRegistry::from_tables([service_requests(), contact_messages(), testimonials()])
}
