use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Shared SDK configuration from the default credential chain
///
/// An explicit region wins over `AWS_REGION` and the profile.
pub async fn load_sdk_config(region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region.map(str::trim).filter(|r| !r.is_empty()) {
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}
