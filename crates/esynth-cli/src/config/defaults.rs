use esynth::engine::config::PartnerPool;

pub struct DefaultsConfig {
    pub max_depth: usize,
    pub partners: PartnerPool,
    pub prune_rejected: bool,
    pub threshold: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            partners: PartnerPool::Linkers,
            prune_rejected: false,
            threshold: 0.5,
        }
    }
}
