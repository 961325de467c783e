/// Switch that turns facial recognition maintenance on or off.
pub trait FeatureGate: Send {
    fn is_disabled(&self) -> bool;
}
