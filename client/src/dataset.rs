use rand::Rng;
use rand_distr::{Distribution, Normal, StandardNormal};

use nndl::linear_algebra::{Matrix, Value};

/// Distance scale of the class centers from the origin.
const CENTER_SCALE: Value = 3.0;

pub struct Dataset {
    pub inputs: Matrix,
    pub labels: Vec<usize>,
}

/// One Gaussian blob per class, each around a randomly placed center.
pub struct Blobs {
    centers: Matrix,
    noise: Normal<Value>,
}

impl Blobs {
    pub fn new(
        features: usize,
        classes: usize,
        spread: Value,
        rng: &mut impl Rng,
    ) -> Result<Self, String> {
        let noise = Normal::new(0.0, spread).map_err(|err| format!("invalid spread: {err}"))?;

        let mut centers = Matrix::zeros(classes, features);
        centers
            .values_mut()
            .for_each(|x| *x = rng.sample::<Value, _>(StandardNormal) * CENTER_SCALE);

        Ok(Self { centers, noise })
    }

    /// Draws `samples` examples, cycling through the classes in order.
    pub fn sample(&self, samples: usize, rng: &mut impl Rng) -> Dataset {
        let classes = self.centers.rows();
        let features = self.centers.columns();

        let mut values = Vec::with_capacity(samples * features);
        let mut labels = Vec::with_capacity(samples);

        for i in 0..samples {
            let class = i % classes;
            values.extend(
                self.centers
                    .row(class)
                    .iter()
                    .map(|center| center + self.noise.sample(rng)),
            );
            labels.push(class);
        }

        Dataset {
            inputs: Matrix::from_vec(values, samples, features),
            labels,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn blobs_shape_and_labels() {
        let mut rng = StdRng::seed_from_u64(1);
        let blobs = Blobs::new(4, 3, 0.5, &mut rng).unwrap();
        let data = blobs.sample(10, &mut rng);

        assert_eq!(data.inputs.shape(), [10, 4]);
        assert_eq!(data.labels, vec![0, 1, 2, 0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn rejects_bad_spread() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(Blobs::new(4, 3, Value::NAN, &mut rng).is_err());
    }
}
