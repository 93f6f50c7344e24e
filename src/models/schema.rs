// Table definitions for the Flyway-migrated public schema. The quoted
// mixed-case table names come from the original Hasura migrations.

diesel::table! {
    #[sql_name = "Integration"]
    integrations (id) {
        id -> Int4,
        user_id -> Uuid,
        #[sql_name = "type"]
        type_ -> Text,
        token -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    #[sql_name = "Project"]
    projects (id) {
        id -> Uuid,
        owner_id -> Uuid,
        name -> Text,
        #[sql_name = "type"]
        type_ -> Text,
        metadata -> Jsonb,
    }
}

diesel::table! {
    #[sql_name = "User"]
    users (id) {
        id -> Uuid,
        email -> Text,
        password -> Text,
        first_name -> Text,
        last_name -> Text,
    }
}

diesel::table! {
    flyway_schema_history (installed_rank) {
        installed_rank -> Int4,
        version -> Nullable<Text>,
        description -> Text,
        #[sql_name = "type"]
        type_ -> Text,
        script -> Text,
        checksum -> Nullable<Int4>,
        installed_by -> Text,
        installed_on -> Timestamp,
        execution_time -> Int4,
        success -> Bool,
    }
}

diesel::joinable!(integrations -> users (user_id));
diesel::joinable!(projects -> users (owner_id));

diesel::allow_tables_to_appear_in_same_query!(flyway_schema_history, integrations, projects, users,);
