mod transformer_spec;
