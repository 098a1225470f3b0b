use actix_web::HttpResponse;
use askama::Template;

pub fn render<T: Template>(template: T) -> HttpResponse {
    render_with(HttpResponse::Ok(), template)
}

/// Renders into a prepared response, e.g. a 422 that re-shows a form.
pub fn render_with<T: Template>(
    mut builder: actix_web::HttpResponseBuilder,
    template: T,
) -> HttpResponse {
    match template.render() {
        Ok(body) => builder.content_type("text/html; charset=utf-8").body(body),
        Err(err) => {
            log::error!("Template render error: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
