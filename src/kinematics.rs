use std::f64::consts::PI;
use std::ops::Add;

/// Azimuthal difference `phi_b - phi_a`, wrapped into (-pi, pi].
#[inline(always)]
pub fn delta_phi(phi_a: f64, phi_b: f64) -> f64 {
    let r = (phi_b - phi_a) % (2.0 * PI);
    if r <= -PI {
        r + 2.0 * PI
    } else if r > PI {
        r - 2.0 * PI
    } else {
        r
    }
}

/// Angular separation in the (eta, phi) plane.
#[inline(always)]
pub fn delta_r(eta_a: f64, phi_a: f64, eta_b: f64, phi_b: f64) -> f64 {
    let deta = eta_b - eta_a;
    let dphi = delta_phi(phi_a, phi_b);
    (deta * deta + dphi * dphi).sqrt()
}

/// Cartesian four-momentum (px, py, pz, E).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FourMomentum {
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    pub e: f64,
}

impl FourMomentum {
    pub fn from_pt_eta_phi_m(pt: f64, eta: f64, phi: f64, mass: f64) -> Self {
        let px = pt * phi.cos();
        let py = pt * phi.sin();
        let pz = pt * eta.sinh();
        let e = (px * px + py * py + pz * pz + mass * mass).sqrt();
        Self { px, py, pz, e }
    }

    pub fn p2(&self) -> f64 {
        self.px * self.px + self.py * self.py + self.pz * self.pz
    }

    /// Invariant mass. Round-off can push the radicand slightly negative,
    /// so it is clamped at zero.
    pub fn mass(&self) -> f64 {
        (self.e * self.e - self.p2()).max(0.0).sqrt()
    }
}

impl Add for FourMomentum {
    type Output = FourMomentum;

    fn add(self, rhs: Self) -> Self {
        Self {
            px: self.px + rhs.px,
            py: self.py + rhs.py,
            pz: self.pz + rhs.pz,
            e: self.e + rhs.e,
        }
    }
}

/// Kinematic inputs of one reconstructed particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PtEtaPhiM {
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub mass: f64,
}

impl From<PtEtaPhiM> for FourMomentum {
    fn from(p: PtEtaPhiM) -> Self {
        FourMomentum::from_pt_eta_phi_m(p.pt, p.eta, p.phi, p.mass)
    }
}

/// Invariant mass of a two-particle system.
pub fn invariant_mass(a: PtEtaPhiM, b: PtEtaPhiM) -> f64 {
    (FourMomentum::from(a) + FourMomentum::from(b)).mass()
}
