use shadow_rs::ShadowBuilder;

fn main() {
    // Version, commit and build time for `movie-api --version`.
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
