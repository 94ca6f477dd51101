use actix_web::web;

pub mod auth;
pub mod categories;
pub mod comments;
pub mod tasks;
pub mod users;

pub fn auth_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(auth::auth_handlers::register))
            .route("/login", web::post().to(auth::auth_handlers::login))
            .route("/logout", web::post().to(auth::auth_handlers::logout)),
    );
}

pub fn users_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(users::user_handlers::list_users))
            .route("/me", web::get().to(users::user_handlers::get_me))
            .route("/me", web::patch().to(users::user_handlers::update_me))
            .route("/{id}", web::get().to(users::user_handlers::get_user)),
    );
}

pub fn tasks_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tasks")
            .route("", web::get().to(tasks::task_handlers::list_tasks))
            .route("", web::post().to(tasks::task_handlers::create_task))
            // Registered ahead of /{id} so "stats" is not taken for a task id.
            .route("/stats", web::get().to(tasks::task_handlers::get_stats))
            .route("/{id}", web::get().to(tasks::task_handlers::get_task))
            .route("/{id}", web::patch().to(tasks::task_handlers::update_task))
            .route("/{id}", web::delete().to(tasks::task_handlers::delete_task))
            .route(
                "/{task_id}/comments",
                web::post().to(comments::comment_handlers::create_comment),
            )
            .route(
                "/{task_id}/comments",
                web::get().to(comments::comment_handlers::list_comments),
            ),
    );
}

pub fn categories_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/categories")
            .route("", web::get().to(categories::category_handlers::list_categories))
            .route("", web::post().to(categories::category_handlers::create_category))
            .route("/{id}", web::get().to(categories::category_handlers::get_category))
            .route("/{id}", web::patch().to(categories::category_handlers::update_category))
            .route("/{id}", web::delete().to(categories::category_handlers::delete_category)),
    );
}

pub fn comments_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/comments").route(
        "/{id}",
        web::delete().to(comments::comment_handlers::delete_comment),
    ));
}
