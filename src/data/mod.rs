pub mod idx;
pub mod pixels;

pub use idx::{
    open_mnist, open_mnist_test, open_mnist_training, IdxImages, IdxLabels, MnistDb, MnistSet,
    MNIST_CLASSES,
};
