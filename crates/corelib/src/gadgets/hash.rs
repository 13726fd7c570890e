//! MiMC hash gadget; evaluates the same rounds as `crypto::mimc` with
//! three multiplication constraints per round.

use crate::circuit::Api;
use crate::crypto::field::Fr;
use crate::crypto::mimc::round_constants;

#[derive(Clone, Debug)]
pub struct HashGadget<V> {
    constants: Vec<Fr>,
    data: Vec<V>,
}

impl<V: Clone> HashGadget<V> {
    pub fn new(label: &str) -> Self {
        Self {
            constants: round_constants(label),
            data: Vec::new(),
        }
    }

    pub fn write(&mut self, elements: &[V]) {
        self.data.extend_from_slice(elements);
    }

    fn encrypt<A: Api<Var = V>>(&self, api: &mut A, message: &V, key: &V) -> V {
        let mut x = message.clone();
        for c in &self.constants {
            let keyed = api.add(&x, key);
            let t = api.add_constant(&keyed, c);
            let t2 = api.mul(&t, &t);
            let t4 = api.mul(&t2, &t2);
            x = api.mul(&t4, &t);
        }
        api.add(&x, key)
    }

    pub fn sum<A: Api<Var = V>>(&self, api: &mut A) -> V {
        let mut h = api.zero();
        for m in &self.data {
            let e = self.encrypt(api, m, &h);
            let eh = api.add(&e, &h);
            h = api.add(&eh, m);
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Api, CircuitBuilder, Evaluator};
    use crate::crypto::mimc::{mimc_hash, Mimc, MIMC_ROUNDS};

    #[test]
    fn gadget_agrees_with_host() {
        let p = Fr::from_u64(123_456_789);
        let mut ev = Evaluator::new();
        let mut g = HashGadget::new("seed");
        g.write(&[p.clone()]);
        assert_eq!(g.sum(&mut ev), mimc_hash("seed", &p));

        let mut host = Mimc::new("seed");
        host.write(&[Fr::one(), Fr::from_u64(2)]);
        let mut g = HashGadget::new("seed");
        g.write(&[Fr::one(), Fr::from_u64(2)]);
        assert_eq!(g.sum(&mut ev), host.sum());
    }

    #[test]
    fn constraint_count_is_three_per_round() {
        let mut b = CircuitBuilder::new();
        let p = b.secret_input("p", Some(&Fr::from_u64(7))).unwrap();
        let mut g = HashGadget::new("seed");
        g.write(&[p]);
        let digest = g.sum(&mut b);
        let (cs, w) = b.finish();
        assert_eq!(cs.num_constraints(), 3 * MIMC_ROUNDS);
        let w = w.unwrap();
        cs.check(&w).unwrap();
        assert_eq!(digest.evaluate(w.values()), Some(mimc_hash("seed", &Fr::from_u64(7))));
    }
}
