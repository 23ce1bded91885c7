use facecam::{
    encoder,
    model::{register_ort, Model},
    result::Result,
    setting::Setting,
    telemetry::{get_subscriber, init_subscriber, DEFAULT_FILTER},
};

fn main() -> Result<()> {
    init_subscriber(get_subscriber("encode_gen", DEFAULT_FILTER, std::io::stderr))?;
    // Get Setting
    let setting = Setting::get()?;
    let config = &setting.config;

    // Register Models
    register_ort(&config.model)?;
    let mut model = Model::new(&config.model)?;

    let encodings = encoder::run(&config.encoder, &mut model, |names| {
        println!("{:?}", names)
    })?;
    tracing::info!(
        embeddings = encodings.embeddings.len(),
        "known faces encoded"
    );
    println!("encoding complete");
    Ok(())
}
