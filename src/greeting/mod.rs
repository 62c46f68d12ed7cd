use serde::Serialize;
use teloxide::types::ChatId;
use tinytemplate::TinyTemplate;

static GREETING: &str = include_str!("greeting.txt");

#[derive(Serialize)]
struct Context<'a> {
    app_name: &'a str,
    chat_id: i64,
}

pub fn render_greeting(app_name: &str, chat_id: ChatId) -> Result<String, tinytemplate::error::Error> {
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    tt.add_template("greeting", GREETING)?;
    tt.render("greeting", &Context { app_name, chat_id: chat_id.0 })
}
