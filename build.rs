use shadow_rs::ShadowBuilder;

fn main() {
    // Build metadata backs `--version` and the application version default.
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
